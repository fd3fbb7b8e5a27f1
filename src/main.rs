//! Arkanoid - headless runner
//!
//! Plays a level set with the autopilot at the controls, then records the
//! score in the high score table.
//!
//! Usage: `arkanoid [LEVEL_SET_JSON] [SETTINGS_JSON]`

use anyhow::Context;
use arkanoid_core::{
    HighScoresTable, ScoreInfo, Settings,
    sim::{GameFlow, LevelSpec, RunEnd, autopilot, load_level_set, parse_level_set},
};

/// Levels played when no level set is given
const DEFAULT_LEVELS: &str = include_str!("../levels/default.json");

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Arkanoid (headless) starting...");

    let mut args = std::env::args().skip(1);
    let levels_path = args.next();
    let settings_path = args.next().unwrap_or_else(|| "settings.json".to_string());

    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading settings from {settings_path}"))?;

    let levels: Vec<LevelSpec> = match &levels_path {
        Some(path) => load_level_set(path).with_context(|| format!("loading levels from {path}"))?,
        None => parse_level_set(DEFAULT_LEVELS).context("parsing the built-in levels")?,
    };

    let mut high_scores = HighScoresTable::load(&settings.high_scores_path)
        .context("loading high scores")?;
    if high_scores.capacity() != settings.high_scores_capacity {
        let mut resized = HighScoresTable::new(settings.high_scores_capacity);
        for entry in high_scores.entries() {
            resized.add(entry.clone());
        }
        high_scores = resized;
    }

    let mut flow = GameFlow::new(&settings);
    let summary = flow
        .run_levels(&levels, autopilot)
        .context("running the level set")?;

    let outcome = match summary.end {
        RunEnd::Completed => "all levels cleared",
        RunEnd::OutOfLives => "game over",
        RunEnd::FrameLimit => "stopped at the frame limit",
    };
    println!(
        "{outcome}: score {}, {} lives left, {}/{} levels cleared",
        summary.score,
        summary.lives,
        summary.levels_cleared,
        levels.len()
    );

    if let Some(rank) = high_scores.add(ScoreInfo::new(settings.player_name.clone(), summary.score)) {
        println!("New high score! Rank {rank}");
    }
    high_scores
        .save(&settings.high_scores_path)
        .context("saving high scores")?;

    println!("\nHigh scores:");
    for (i, entry) in high_scores.entries().iter().enumerate() {
        println!("{:>2}. {:<16} {:>8}", i + 1, entry.name, entry.score);
    }

    Ok(())
}
