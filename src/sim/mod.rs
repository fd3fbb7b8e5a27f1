//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One trajectory segment per ball per frame
//! - Stable iteration order (registration order for collidables, id order for balls)
//! - No rendering or platform dependencies

pub mod ball;
pub mod block;
pub mod collidable;
pub mod environment;
pub mod flow;
pub mod game_level;
pub mod geometry;
pub mod level;
pub mod paddle;
pub mod velocity;

pub use ball::{Ball, BallId, Motion};
pub use block::Block;
pub use collidable::{Collidable, CollidableId, Colliders, CollisionInfo, HitEvent, HitListener};
pub use environment::GameEnvironment;
pub use flow::{GameFlow, RunEnd, RunSummary};
pub use game_level::{GameLevel, LevelPhase, Scoreboard, TickInput, autopilot};
pub use geometry::{EPSILON, Line, Point, Rectangle, approx_eq};
pub use level::{
    BallLaunch, BlockAttributes, BlockDefinitions, BlockTemplate, LevelSpec, load_level_set,
    parse_level_set,
};
pub use paddle::Paddle;
pub use velocity::Velocity;
