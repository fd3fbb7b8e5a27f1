//! Arkanoid core - a headless block-breaking engine
//!
//! Core modules:
//! - `sim`: Collision geometry, ball motion, levels and game flow
//! - `highscores`: Persistent high-scores table
//! - `settings`: Runtime configuration
//! - `error`: Crate error type

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::{HighScoresTable, ScoreInfo};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;

    /// Side borders are this wide; the top border also covers the HUD strip
    pub const BORDER_THICKNESS: f64 = 20.0;
    pub const TOP_BORDER_HEIGHT: f64 = 50.0;
    /// Side borders start below the HUD strip
    pub const SIDE_BORDER_TOP: f64 = 30.0;

    /// Strip below the screen; a ball hitting it is out of play
    pub const DEATH_REGION_HEIGHT: f64 = 30.0;

    /// Paddle defaults
    pub const PADDLE_Y: f64 = 575.0;
    pub const PADDLE_HEIGHT: f64 = 20.0;
    /// Number of angular bands across the paddle top
    pub const PADDLE_REGIONS: u32 = 5;
    /// Outgoing angle per band, left to right (degrees, 0 = up, clockwise)
    pub const PADDLE_BAND_ANGLES: [f64; 5] = [300.0, 330.0, 360.0, 30.0, 60.0];

    /// Ball defaults
    pub const BALL_START_Y: f64 = 566.0;
    pub const BALL_RADIUS: f64 = 7.0;
    /// Downward nudge applied when a hit leaves the velocity unchanged
    pub const STUCK_ESCAPE_OFFSET: f64 = 20.0;

    /// Scoring
    pub const HIT_SCORE: u64 = 5;
    pub const DESTROY_BONUS: u64 = 10;
    pub const LEVEL_CLEAR_BONUS: u64 = 100;

    /// Player defaults
    pub const DEFAULT_LIVES: u32 = 7;
    pub const DEFAULT_HIGH_SCORES: usize = 5;
}
