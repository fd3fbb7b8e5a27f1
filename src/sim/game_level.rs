//! One level in play: borders, blocks, paddle, balls and the listeners that
//! react to hits
//!
//! The level is advanced one frame at a time with [`GameLevel::tick`].

use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallId};
use super::block::Block;
use super::collidable::{CollidableId, Colliders, HitEvent, HitListener};
use super::environment::GameEnvironment;
use super::geometry::{Point, Rectangle};
use super::level::LevelSpec;
use super::paddle::Paddle;
use super::velocity::Velocity;
use crate::consts::*;
use crate::error::Result;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Score and lives carried from level to level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub lives: u32,
}

impl Scoreboard {
    pub fn new(lives: u32) -> Self {
        Self { score: 0, lives }
    }
}

/// Where the current turn stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Set up, waiting for a turn to start
    Ready,
    /// Balls in motion
    Playing,
    /// Every required block is gone
    Cleared,
    /// Every ball fell into the death region
    OutOfBalls,
}

/// A level being played
#[derive(Debug, Clone)]
pub struct GameLevel {
    spec: LevelSpec,
    environment: GameEnvironment,
    colliders: Colliders,
    balls: Vec<Ball>,
    paddle: Option<CollidableId>,
    scoreboard: Scoreboard,
    remaining_blocks: u32,
    available_balls: u32,
    phase: LevelPhase,
    frames: u64,
    next_ball_id: u32,
}

impl GameLevel {
    pub fn new(spec: LevelSpec, scoreboard: Scoreboard) -> Self {
        let available_balls = spec.number_of_balls() as u32;
        Self {
            spec,
            environment: GameEnvironment::new(),
            colliders: Colliders::new(),
            balls: Vec::new(),
            paddle: None,
            scoreboard,
            remaining_blocks: 0,
            available_balls,
            phase: LevelPhase::Ready,
            frames: 0,
            next_ball_id: 1,
        }
    }

    /// Register borders, the death region and the level's blocks
    pub fn initialize(&mut self) -> Result<()> {
        let templates = self.spec.blocks()?;
        self.remaining_blocks = self.spec.number_of_blocks_to_remove(&templates);

        // Death region first: it sits below everything and only removes balls
        let death_region = Rectangle::from_coords(0.0, SCREEN_HEIGHT, SCREEN_WIDTH, DEATH_REGION_HEIGHT);
        self.add_block(death_region, 0, &[HitListener::BallRemover]);

        for border in border_rectangles() {
            self.add_block(border, 0, &[]);
        }

        for template in &templates {
            self.add_block(
                template.rect,
                template.hit_points,
                &[HitListener::ScoreTracker, HitListener::BlockRemover],
            );
        }

        log::info!(
            "Level '{}' initialized: {} blocks, {} to remove",
            self.spec.name,
            templates.len(),
            self.remaining_blocks
        );
        Ok(())
    }

    fn add_block(&mut self, rect: Rectangle, hit_points: u32, listeners: &[HitListener]) -> CollidableId {
        let id = self.colliders.insert_block(|id| {
            let mut block = Block::new(id, rect, hit_points);
            for listener in listeners {
                block.add_hit_listener(*listener);
            }
            block
        });
        self.environment.add_collidable(id);
        id
    }

    /// Deregister from the environment before dropping the entity
    fn remove_collidable(&mut self, id: CollidableId) {
        self.environment.remove_collidable(id);
        self.colliders.remove(id);
    }

    /// Start a turn: fresh balls and a centered paddle
    pub fn play_one_turn(&mut self) {
        self.create_balls();

        if let Some(old) = self.paddle.take() {
            self.remove_collidable(old);
        }
        let width = self.spec.paddle_width;
        let rect = Rectangle::from_coords(SCREEN_WIDTH / 2.0 - width / 2.0, PADDLE_Y, width, PADDLE_HEIGHT);
        let speed = self.spec.paddle_speed;
        let id = self.colliders.insert_paddle(|id| Paddle::new(id, rect, speed));
        self.environment.add_collidable(id);
        self.paddle = Some(id);

        self.phase = LevelPhase::Playing;
        log::info!(
            "Turn started on '{}': {} balls, {} lives",
            self.spec.name,
            self.balls.len(),
            self.scoreboard.lives
        );
    }

    /// Spread the level's balls around the screen center, just above the paddle
    fn create_balls(&mut self) {
        let velocities = self.spec.initial_ball_velocities();
        let count = velocities.len();
        if count == 0 {
            return;
        }

        let spacing = (self.spec.paddle_width / count as f64).floor();
        let center = SCREEN_WIDTH / 2.0;
        let mut x = if count % 2 == 1 {
            center - ((count - 1) / 2) as f64 * spacing
        } else {
            center - (spacing / 2.0).floor() - (count / 2 - 1) as f64 * spacing
        };

        for velocity in velocities {
            let id = BallId(self.next_ball_id);
            self.next_ball_id += 1;
            self.balls
                .push(Ball::new(id, Point::new(x, BALL_START_Y)).with_velocity(velocity));
            x += spacing;
        }
    }

    /// Advance the level by one frame
    pub fn tick(&mut self, input: &TickInput) -> Result<LevelPhase> {
        if self.phase != LevelPhase::Playing {
            return Ok(self.phase);
        }
        self.frames += 1;

        let ids: Vec<BallId> = self.balls.iter().map(|b| b.id).collect();
        let mut events = Vec::new();
        for id in ids {
            // An earlier ball's events may have removed this one
            let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) else {
                continue;
            };
            ball.move_one_step(&self.environment, &mut self.colliders, &mut events)?;
            for event in events.drain(..) {
                self.dispatch_hit(&event);
            }
        }

        if let Some(paddle) = self.paddle_mut() {
            if input.left {
                paddle.move_left();
            } else if input.right {
                paddle.move_right();
            }
        }

        if self.remaining_blocks == 0 {
            self.scoreboard.score += LEVEL_CLEAR_BONUS;
            self.finish_turn(LevelPhase::Cleared);
        } else if self.available_balls == 0 {
            self.finish_turn(LevelPhase::OutOfBalls);
        }

        Ok(self.phase)
    }

    fn finish_turn(&mut self, phase: LevelPhase) {
        if let Some(paddle) = self.paddle.take() {
            self.remove_collidable(paddle);
        }
        self.phase = phase;
        log::info!(
            "Turn over on '{}' after {} frames: {:?}, score {}",
            self.spec.name,
            self.frames,
            phase,
            self.scoreboard.score
        );
    }

    /// Close out a finished turn; losing every ball costs a life
    pub fn end_turn(&mut self) {
        self.balls.clear();
        if self.available_balls == 0 {
            self.available_balls = self.spec.number_of_balls() as u32;
            self.scoreboard.lives = self.scoreboard.lives.saturating_sub(1);
            log::info!("Life lost, {} remaining", self.scoreboard.lives);
        }
        if self.phase != LevelPhase::Cleared {
            self.phase = LevelPhase::Ready;
        }
    }

    fn dispatch_hit(&mut self, event: &HitEvent) {
        for listener in &event.listeners {
            match listener {
                HitListener::ScoreTracker => {
                    self.scoreboard.score += HIT_SCORE;
                    if event.hit_points == 1 {
                        self.scoreboard.score += DESTROY_BONUS;
                    }
                }
                HitListener::BlockRemover => {
                    if event.hit_points == 1 {
                        if let Some(block) = self
                            .colliders
                            .get_mut(event.block)
                            .and_then(|c| c.as_block_mut())
                        {
                            block.remove_hit_listener(HitListener::BlockRemover);
                        }
                        self.remove_collidable(event.block);
                        self.remaining_blocks = self.remaining_blocks.saturating_sub(1);
                        log::debug!(
                            "Block {} destroyed, {} remaining",
                            event.block,
                            self.remaining_blocks
                        );
                    }
                }
                HitListener::BallRemover => {
                    let before = self.balls.len();
                    self.balls.retain(|b| b.id != event.hitter);
                    if self.balls.len() < before {
                        self.available_balls = self.available_balls.saturating_sub(1);
                        log::debug!(
                            "Ball {} lost, {} in play",
                            event.hitter,
                            self.available_balls
                        );
                    }
                }
            }
        }
    }

    fn paddle_mut(&mut self) -> Option<&mut Paddle> {
        let id = self.paddle?;
        self.colliders.get_mut(id).and_then(|c| c.as_paddle_mut())
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        let id = self.paddle?;
        self.colliders.get(id).and_then(|c| c.as_paddle())
    }

    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn environment(&self) -> &GameEnvironment {
        &self.environment
    }

    pub fn colliders(&self) -> &Colliders {
        &self.colliders
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn remaining_blocks(&self) -> u32 {
        self.remaining_blocks
    }

    pub fn available_balls(&self) -> u32 {
        self.available_balls
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Top (with the HUD strip), left and right borders
fn border_rectangles() -> [Rectangle; 3] {
    [
        Rectangle::from_coords(0.0, 0.0, SCREEN_WIDTH, TOP_BORDER_HEIGHT),
        Rectangle::from_coords(
            0.0,
            SIDE_BORDER_TOP,
            BORDER_THICKNESS,
            SCREEN_HEIGHT - SIDE_BORDER_TOP,
        ),
        Rectangle::from_coords(
            SCREEN_WIDTH - BORDER_THICKNESS,
            SIDE_BORDER_TOP,
            BORDER_THICKNESS,
            SCREEN_HEIGHT - SIDE_BORDER_TOP,
        ),
    ]
}

/// Frames the autopilot keeps to one band before trying the next when no
/// band lines up with a block
const AUTOPILOT_BAND_PERIOD: u64 = 600;

/// Steer the paddle so the next falling ball is sent toward a block
///
/// Idle/demo mode: lets the binary and tests play without a keyboard. The
/// paddle goes where the soonest-landing ball meets the band whose outgoing
/// angle crosses a remaining block. If no reachable band does, the band is
/// cycled every 600 frames so the ball cannot settle
/// into a loop that never touches a block.
pub fn autopilot(level: &GameLevel) -> TickInput {
    let Some(paddle) = level.paddle() else {
        return TickInput::default();
    };

    let target_x = match next_landing(level.balls()) {
        Some((land_x, frames_left)) => aim_paddle(level, paddle, land_x, frames_left),
        // Nothing falling: wait under the lowest ball
        None => match level
            .balls()
            .iter()
            .max_by(|a, b| a.center.y.total_cmp(&b.center.y))
        {
            Some(ball) => ball.center.x,
            None => return TickInput::default(),
        },
    };

    let offset = target_x - paddle.center_x();
    let dead_zone = paddle.speed() / 2.0;
    TickInput {
        left: offset < -dead_zone,
        right: offset > dead_zone,
    }
}

/// Where the soonest-landing ball reaches the paddle line, and in how many frames
fn next_landing(balls: &[Ball]) -> Option<(f64, f64)> {
    balls
        .iter()
        .filter_map(|ball| {
            let velocity = ball.velocity.filter(|v| v.dy > 0.0)?;
            let frames = ((PADDLE_Y - ball.center.y) / velocity.dy).max(0.0);
            Some((fold_between_borders(ball.center.x + velocity.dx * frames), frames))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Paddle center for a ball landing at `land_x`
fn aim_paddle(level: &GameLevel, paddle: &Paddle, land_x: f64, frames_left: f64) -> f64 {
    let width = paddle.rect().width();
    let region = width / PADDLE_REGIONS as f64;
    let reach = paddle.speed() * frames_left;
    let lowest = BORDER_THICKNESS + width / 2.0;
    let highest = SCREEN_WIDTH - BORDER_THICKNESS - width / 2.0;

    let targets: Vec<&Rectangle> = level
        .colliders()
        .blocks()
        .filter(|b| b.listeners().contains(&HitListener::BlockRemover))
        .map(Block::rect)
        .collect();

    let mut reachable = Vec::new();
    let mut best: Option<(f64, f64)> = None;
    for (band, &angle) in PADDLE_BAND_ANGLES.iter().enumerate() {
        // Center that puts the landing point in the middle of this band
        let center = land_x - (band as f64 + 0.5) * region + width / 2.0;
        if center < lowest || center > highest || (center - paddle.center_x()).abs() > reach {
            continue;
        }

        let heading = Velocity::from_angle_and_speed(angle, 1.0);
        let miss = targets
            .iter()
            .map(|rect| {
                let rise = rect.center().y - PADDLE_Y;
                let x = fold_between_borders(land_x + heading.dx * rise / heading.dy);
                (rect.left() - x).max(x - rect.right()).max(0.0)
            })
            .fold(f64::INFINITY, f64::min);

        reachable.push(center);
        if best.is_none_or(|(_, closest)| miss < closest) {
            best = Some((center, miss));
        }
    }

    match best {
        None => land_x,
        Some((center, miss)) if miss == 0.0 => center,
        Some(_) => {
            let turn = (level.frames() / AUTOPILOT_BAND_PERIOD) as usize;
            reachable[turn % reachable.len()]
        }
    }
}

/// Reflect `x` off the side borders the way a ball travelling there would
fn fold_between_borders(x: f64) -> f64 {
    let span = SCREEN_WIDTH - 2.0 * BORDER_THICKNESS;
    let t = (x - BORDER_THICKNESS).rem_euclid(2.0 * span);
    BORDER_THICKNESS + if t > span { 2.0 * span - t } else { t }
}
