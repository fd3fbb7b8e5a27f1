//! Game flow: play levels in order until they run out or the lives do

use serde::{Deserialize, Serialize};

use super::game_level::{GameLevel, LevelPhase, Scoreboard, TickInput};
use super::level::LevelSpec;
use crate::error::Result;
use crate::settings::Settings;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    /// Every level was cleared
    Completed,
    /// The last life was lost
    OutOfLives,
    /// A turn exceeded the configured frame cap
    FrameLimit,
}

/// Outcome of a full run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub lives: u32,
    pub levels_cleared: usize,
    pub end: RunEnd,
}

/// Drives levels in sequence, carrying score and lives across them
#[derive(Debug, Clone)]
pub struct GameFlow {
    scoreboard: Scoreboard,
    max_frames_per_turn: Option<u64>,
}

impl GameFlow {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scoreboard: Scoreboard::new(settings.lives),
            max_frames_per_turn: settings.max_frames_per_turn,
        }
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Play `levels` in order, asking `input` for the controls every frame
    pub fn run_levels<F>(&mut self, levels: &[LevelSpec], mut input: F) -> Result<RunSummary>
    where
        F: FnMut(&GameLevel) -> TickInput,
    {
        let mut levels_cleared = 0;

        for spec in levels {
            let mut level = GameLevel::new(spec.clone(), self.scoreboard);
            level.initialize()?;

            while level.scoreboard().lives > 0 && level.remaining_blocks() > 0 {
                level.play_one_turn();
                let finished = self.play_turn(&mut level, &mut input)?;
                level.end_turn();
                self.scoreboard = level.scoreboard();

                if !finished {
                    log::warn!(
                        "Turn on '{}' hit the frame limit, abandoning run",
                        level.name()
                    );
                    return Ok(self.summary(levels_cleared, RunEnd::FrameLimit));
                }
            }

            if level.phase() == LevelPhase::Cleared {
                levels_cleared += 1;
                log::info!("Level '{}' cleared, score {}", level.name(), self.scoreboard.score);
            }

            if self.scoreboard.lives == 0 {
                log::info!("Out of lives on '{}'", level.name());
                return Ok(self.summary(levels_cleared, RunEnd::OutOfLives));
            }
        }

        Ok(self.summary(levels_cleared, RunEnd::Completed))
    }

    /// Tick until the turn ends; false if the frame cap cut it short
    fn play_turn<F>(&self, level: &mut GameLevel, input: &mut F) -> Result<bool>
    where
        F: FnMut(&GameLevel) -> TickInput,
    {
        let mut frames = 0u64;
        loop {
            if self.max_frames_per_turn.is_some_and(|max| frames >= max) {
                return Ok(false);
            }
            let controls = input(&*level);
            if level.tick(&controls)? != LevelPhase::Playing {
                return Ok(true);
            }
            frames += 1;
        }
    }

    fn summary(&self, levels_cleared: usize, end: RunEnd) -> RunSummary {
        RunSummary {
            score: self.scoreboard.score,
            lives: self.scoreboard.lives,
            levels_cleared,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{BallLaunch, BlockAttributes, BlockDefinitions};

    fn level(name: &str, angle: f64, speed: f64, paddle_width: f64) -> LevelSpec {
        LevelSpec {
            name: name.into(),
            ball_velocities: vec![BallLaunch { angle, speed }],
            paddle_speed: 5.0,
            paddle_width,
            blocks_start_x: 380.0,
            blocks_start_y: 300.0,
            row_height: 20.0,
            block_definitions: BlockDefinitions {
                defaults: BlockAttributes {
                    width: Some(40.0),
                    height: Some(20.0),
                    hit_points: Some(1),
                },
                symbols: [("a".to_string(), BlockAttributes::default())]
                    .into_iter()
                    .collect(),
                spacers: Default::default(),
            },
            layout: vec!["a".into()],
            blocks_to_remove: None,
        }
    }

    fn settings(lives: u32, max_frames: Option<u64>) -> Settings {
        Settings {
            lives,
            max_frames_per_turn: max_frames,
            ..Settings::default()
        }
    }

    fn idle(_: &GameLevel) -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_clearing_every_level() {
        let levels = [level("one", 0.0, 5.0, 100.0), level("two", 0.0, 5.0, 100.0)];
        let mut flow = GameFlow::new(&settings(3, Some(1000)));
        let summary = flow.run_levels(&levels, idle).unwrap();

        assert_eq!(summary.end, RunEnd::Completed);
        assert_eq!(summary.levels_cleared, 2);
        assert_eq!(summary.score, 230);
        assert_eq!(summary.lives, 3);
        assert_eq!(flow.scoreboard().score, 230);
    }

    #[test]
    fn test_running_out_of_lives() {
        // Every turn the only ball slips past a thin paddle
        let levels = [level("doomed", 150.0, 10.0, 4.0), level("never", 0.0, 5.0, 100.0)];
        let mut flow = GameFlow::new(&settings(2, Some(1000)));
        let summary = flow.run_levels(&levels, idle).unwrap();

        assert_eq!(summary.end, RunEnd::OutOfLives);
        assert_eq!(summary.lives, 0);
        assert_eq!(summary.levels_cleared, 0);
        assert_eq!(summary.score, 0);
    }

    #[test]
    fn test_frame_limit_stops_run() {
        // Horizontal ball bouncing between the side borders forever
        let levels = [level("endless", 90.0, 5.0, 100.0)];
        let mut flow = GameFlow::new(&settings(3, Some(500)));
        let summary = flow.run_levels(&levels, idle).unwrap();

        assert_eq!(summary.end, RunEnd::FrameLimit);
        assert_eq!(summary.lives, 3);
    }

    #[test]
    fn test_input_is_polled_every_frame() {
        let levels = [level("one", 0.0, 5.0, 100.0)];
        let mut flow = GameFlow::new(&settings(3, Some(1000)));
        let mut polls = 0;
        flow.run_levels(&levels, |_| {
            polls += 1;
            TickInput::default()
        })
        .unwrap();
        // The block is struck on the 50th frame
        assert_eq!(polls, 50);
    }
}
