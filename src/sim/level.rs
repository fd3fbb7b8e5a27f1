//! Level definitions
//!
//! A level is described in JSON: ball launch headings, paddle shape and a
//! block layout written as rows of symbols. Symbols map to block sizes and
//! hit points; spacer symbols leave gaps.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::geometry::Rectangle;
use super::velocity::Velocity;
use crate::error::{Error, Result};

/// Launch heading for one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallLaunch {
    /// Degrees, 0 = up, clockwise
    pub angle: f64,
    pub speed: f64,
}

impl BallLaunch {
    pub fn velocity(&self) -> Velocity {
        Velocity::from_angle_and_speed(self.angle, self.speed)
    }
}

/// Block attributes; unset fields fall back to the definitions' defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<u32>,
}

/// Symbol table used by a level's layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinitions {
    #[serde(default)]
    pub defaults: BlockAttributes,
    /// Block symbol -> attributes
    #[serde(default)]
    pub symbols: BTreeMap<String, BlockAttributes>,
    /// Spacer symbol -> gap width
    #[serde(default)]
    pub spacers: BTreeMap<String, f64>,
}

/// A fully resolved block template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTemplate {
    pub rect: Rectangle,
    pub hit_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedSymbol {
    width: f64,
    height: f64,
    hit_points: u32,
}

/// Everything needed to set up one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    pub ball_velocities: Vec<BallLaunch>,
    pub paddle_speed: f64,
    pub paddle_width: f64,
    pub blocks_start_x: f64,
    pub blocks_start_y: f64,
    pub row_height: f64,
    #[serde(default)]
    pub block_definitions: BlockDefinitions,
    #[serde(default)]
    pub layout: Vec<String>,
    /// Blocks that must break to clear the level (defaults to every breakable block)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks_to_remove: Option<u32>,
}

impl LevelSpec {
    pub fn number_of_balls(&self) -> usize {
        self.ball_velocities.len()
    }

    pub fn initial_ball_velocities(&self) -> Vec<Velocity> {
        self.ball_velocities.iter().map(BallLaunch::velocity).collect()
    }

    /// Check the level can be played
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(Error::invalid_level(&self.name, reason));

        if self.ball_velocities.is_empty() {
            return invalid("at least one ball velocity is required".into());
        }
        if let Some(launch) = self.ball_velocities.iter().find(|b| b.speed < 0.0) {
            return invalid(format!("negative ball speed {}", launch.speed));
        }
        if self.paddle_width <= 0.0 {
            return invalid(format!("paddle width must be positive, got {}", self.paddle_width));
        }
        if self.paddle_speed < 0.0 {
            return invalid(format!("negative paddle speed {}", self.paddle_speed));
        }
        if self.row_height < 0.0 {
            return invalid(format!("negative row height {}", self.row_height));
        }

        let defs = &self.block_definitions;
        for key in defs.symbols.keys().chain(defs.spacers.keys()) {
            if key.chars().count() != 1 {
                return invalid(format!("symbol `{key}` must be a single character"));
            }
        }
        if let Some((key, width)) = defs.spacers.iter().find(|(_, w)| **w < 0.0) {
            return invalid(format!("spacer `{key}` has negative width {width}"));
        }
        for key in defs.symbols.keys() {
            self.resolve(key)?;
        }

        Ok(())
    }

    fn resolve(&self, symbol: &str) -> Result<ResolvedSymbol> {
        let defs = &self.block_definitions;
        let attrs = defs.symbols.get(symbol).cloned().unwrap_or_default();
        let missing =
            |field: &str| Error::invalid_level(&self.name, format!("symbol `{symbol}` has no {field}"));

        let resolved = ResolvedSymbol {
            width: attrs
                .width
                .or(defs.defaults.width)
                .ok_or_else(|| missing("width"))?,
            height: attrs
                .height
                .or(defs.defaults.height)
                .ok_or_else(|| missing("height"))?,
            hit_points: attrs
                .hit_points
                .or(defs.defaults.hit_points)
                .ok_or_else(|| missing("hit_points"))?,
        };

        if resolved.width < 0.0 || resolved.height < 0.0 {
            return Err(Error::invalid_level(
                &self.name,
                format!(
                    "symbol `{symbol}` has negative size {}x{}",
                    resolved.width, resolved.height
                ),
            ));
        }
        Ok(resolved)
    }

    /// Expand the layout rows into positioned blocks
    ///
    /// Each row starts at `blocks_start_x`; block symbols place a block and
    /// advance by its width, spacers advance by their width, anything else is
    /// skipped. Rows are `row_height` apart.
    pub fn blocks(&self) -> Result<Vec<BlockTemplate>> {
        let mut symbols = BTreeMap::new();
        for key in self.block_definitions.symbols.keys() {
            symbols.insert(key.as_str(), self.resolve(key)?);
        }

        let mut blocks = Vec::new();
        let mut y = self.blocks_start_y;
        let mut buf = [0u8; 4];

        for row in &self.layout {
            let mut x = self.blocks_start_x;
            for ch in row.chars() {
                let key: &str = ch.encode_utf8(&mut buf);
                if let Some(symbol) = symbols.get(key) {
                    blocks.push(BlockTemplate {
                        rect: Rectangle::from_coords(x, y, symbol.width, symbol.height),
                        hit_points: symbol.hit_points,
                    });
                    x += symbol.width;
                } else if let Some(gap) = self.block_definitions.spacers.get(key) {
                    x += gap;
                }
            }
            y += self.row_height;
        }

        Ok(blocks)
    }

    /// Blocks to break before the level counts as cleared
    pub fn number_of_blocks_to_remove(&self, blocks: &[BlockTemplate]) -> u32 {
        self.blocks_to_remove
            .unwrap_or_else(|| blocks.iter().filter(|b| b.hit_points > 0).count() as u32)
    }
}

fn parse_levels(json: &str, origin: PathBuf) -> Result<Vec<LevelSpec>> {
    let levels: Vec<LevelSpec> =
        serde_json::from_str(json).map_err(|e| Error::json(origin, e))?;
    for level in &levels {
        level.validate()?;
    }
    Ok(levels)
}

/// Parse and validate a level set (a JSON array of levels)
pub fn parse_level_set(json: &str) -> Result<Vec<LevelSpec>> {
    parse_levels(json, PathBuf::from("<level set>"))
}

/// Read, parse and validate a level set file
pub fn load_level_set(path: impl AsRef<Path>) -> Result<Vec<LevelSpec>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let levels = parse_levels(&json, path.to_path_buf())?;
    log::info!("Loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}
