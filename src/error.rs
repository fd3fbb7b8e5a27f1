//! Crate error type

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::BallId;

#[derive(Debug, Error)]
pub enum Error {
    /// A ball was asked to move before it was given a velocity
    #[error("ball {0} has no velocity set")]
    VelocityNotSet(BallId),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid level `{level}`: {reason}")]
    InvalidLevel { level: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_level(level: &str, reason: impl Into<String>) -> Self {
        Error::InvalidLevel {
            level: level.to_string(),
            reason: reason.into(),
        }
    }
}
