//! Runtime settings
//!
//! Read from a JSON file; any field left out takes its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HIGH_SCORES, DEFAULT_LIVES};
use crate::error::{Error, Result};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded with a qualifying high score
    pub player_name: String,
    /// Lives at the start of a run
    pub lives: u32,
    /// Size of the high score table
    pub high_scores_capacity: usize,
    /// Where the high score table is stored
    pub high_scores_path: PathBuf,
    /// Abandon a turn after this many frames (None = never)
    pub max_frames_per_turn: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            lives: DEFAULT_LIVES,
            high_scores_capacity: DEFAULT_HIGH_SCORES,
            high_scores_path: PathBuf::from("highscores.json"),
            // Autopilot can keep a ball bouncing forever
            max_frames_per_turn: Some(100_000),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json).map_err(|e| Error::json(path, e))?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::json(path, e))?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.lives, 7);
        assert_eq!(s.high_scores_capacity, 5);
        assert!(s.max_frames_per_turn.is_some());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "player_name": "Ada", "lives": 2 }"#).unwrap();
        assert_eq!(s.player_name, "Ada");
        assert_eq!(s.lives, 2);
        assert_eq!(s.high_scores_path, Settings::default().high_scores_path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("arkanoid-core-no-such-settings.json");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "arkanoid-core-settings-{}.json",
            std::process::id()
        ));
        let s = Settings {
            player_name: "Grace".into(),
            max_frames_per_turn: None,
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
        std::fs::remove_file(&path).unwrap();
    }
}
