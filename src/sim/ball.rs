//! Ball motion: one trajectory segment per frame

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collidable::{CollidableId, Colliders, HitEvent};
use super::environment::GameEnvironment;
use super::geometry::{Line, Point};
use super::velocity::Velocity;
use crate::consts::*;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a ball during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Nothing in the way; the center advanced by the velocity
    Free,
    /// Struck a collidable; velocity changed, center stayed put
    Bounced { collidable: CollidableId, point: Point },
    /// Struck a collidable that left the velocity unchanged (ball embedded
    /// in it); the center was pushed down to break free
    Unstuck { collidable: CollidableId, point: Point },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub center: Point,
    pub radius: f64,
    pub velocity: Option<Velocity>,
}

impl Ball {
    pub fn new(id: BallId, center: Point) -> Self {
        Self {
            id,
            center,
            radius: BALL_RADIUS,
            velocity: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = Some(velocity);
    }

    /// Segment the ball would travel this frame if nothing were in the way
    pub fn trajectory(&self) -> Result<Line> {
        let velocity = self.velocity.ok_or(Error::VelocityNotSet(self.id))?;
        Ok(Line::new(self.center, velocity.apply_to_point(self.center)))
    }

    /// Advance one frame against the collidables in `environment`
    ///
    /// Hit notifications from struck blocks are appended to `events`; the
    /// caller dispatches them once the step is done.
    pub fn move_one_step(
        &mut self,
        environment: &GameEnvironment,
        colliders: &mut Colliders,
        events: &mut Vec<HitEvent>,
    ) -> Result<Motion> {
        let velocity = self.velocity.ok_or(Error::VelocityNotSet(self.id))?;
        let trajectory = Line::new(self.center, velocity.apply_to_point(self.center));

        let Some(collision) = environment.closest_collision(&trajectory, colliders) else {
            self.center = velocity.apply_to_point(self.center);
            return Ok(Motion::Free);
        };

        let Some(collidable) = colliders.get_mut(collision.collidable) else {
            // closest_collision only reports ids it found in `colliders`
            log::warn!(
                "Ball {} hit collidable {} that no longer exists, moving on",
                self.id,
                collision.collidable
            );
            self.center = velocity.apply_to_point(self.center);
            return Ok(Motion::Free);
        };

        let new_velocity = collidable.hit(self.id, collision.point, velocity, events);
        self.velocity = Some(new_velocity);

        if new_velocity.approx_eq(&velocity) {
            log::debug!(
                "Ball {} stuck against {}, nudging down by {}",
                self.id,
                collision.collidable,
                STUCK_ESCAPE_OFFSET
            );
            self.center.y += STUCK_ESCAPE_OFFSET;
            return Ok(Motion::Unstuck {
                collidable: collision.collidable,
                point: collision.point,
            });
        }

        Ok(Motion::Bounced {
            collidable: collision.collidable,
            point: collision.point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::Block;
    use crate::sim::geometry::Rectangle;
    use crate::sim::paddle::Paddle;
    use proptest::prelude::*;

    struct World {
        env: GameEnvironment,
        colliders: Colliders,
        events: Vec<HitEvent>,
    }

    impl World {
        fn new() -> Self {
            Self {
                env: GameEnvironment::new(),
                colliders: Colliders::new(),
                events: Vec::new(),
            }
        }

        fn add_block(&mut self, rect: Rectangle, hit_points: u32) -> CollidableId {
            let id = self.colliders.insert_block(|id| Block::new(id, rect, hit_points));
            self.env.add_collidable(id);
            id
        }

        fn add_paddle(&mut self, rect: Rectangle) -> CollidableId {
            let id = self.colliders.insert_paddle(|id| Paddle::new(id, rect, 10.0));
            self.env.add_collidable(id);
            id
        }

        fn step(&mut self, ball: &mut Ball) -> Motion {
            ball.move_one_step(&self.env, &mut self.colliders, &mut self.events)
                .unwrap()
        }
    }

    #[test]
    fn test_missing_velocity_is_an_error() {
        let mut world = World::new();
        let mut ball = Ball::new(BallId(3), Point::new(10.0, 10.0));
        let result = ball.move_one_step(&world.env, &mut world.colliders, &mut world.events);
        assert!(matches!(result, Err(Error::VelocityNotSet(BallId(3)))));
        assert!(ball.trajectory().is_err());
    }

    #[test]
    fn test_free_move() {
        let mut world = World::new();
        let mut ball = Ball::new(BallId(1), Point::new(10.0, 10.0)).with_velocity(Velocity::new(2.0, 3.0));
        assert_eq!(world.step(&mut ball), Motion::Free);
        assert_eq!(ball.center, Point::new(12.0, 13.0));
    }

    #[test]
    fn test_falling_onto_block_top_bounces() {
        let mut world = World::new();
        let block = world.add_block(Rectangle::from_coords(100.0, 100.0, 50.0, 20.0), 2);
        let mut ball = Ball::new(BallId(1), Point::new(120.0, 97.0)).with_velocity(Velocity::new(1.0, 5.0));

        let motion = world.step(&mut ball);
        let Motion::Bounced { collidable, point } = motion else {
            panic!("expected a bounce, got {motion:?}");
        };
        assert_eq!(collidable, block);
        assert!((point.y - 100.0).abs() < 1e-9);
        // dy flips, dx kept, center does not move on the collision frame
        assert_eq!(ball.velocity, Some(Velocity::new(1.0, -5.0)));
        assert_eq!(ball.center, Point::new(120.0, 97.0));
        assert_eq!(world.events.len(), 1);
        assert_eq!(world.events[0].hit_points, 2);
    }

    #[test]
    fn test_nearest_of_two_blocks_is_struck() {
        let mut world = World::new();
        let _far = world.add_block(Rectangle::from_coords(100.0, 40.0, 50.0, 20.0), 1);
        let near = world.add_block(Rectangle::from_coords(100.0, 80.0, 50.0, 20.0), 1);
        let mut ball = Ball::new(BallId(1), Point::new(120.0, 110.0)).with_velocity(Velocity::new(0.0, -100.0));

        let motion = world.step(&mut ball);
        assert!(matches!(motion, Motion::Bounced { collidable, .. } if collidable == near));
    }

    #[test]
    fn test_paddle_top_hit_redirects() {
        let mut world = World::new();
        world.add_paddle(Rectangle::from_coords(350.0, 575.0, 100.0, 20.0));
        // Falls onto the leftmost fifth of the paddle
        let mut ball = Ball::new(BallId(1), Point::new(360.0, 572.0)).with_velocity(Velocity::new(0.0, 5.0));

        world.step(&mut ball);
        let v = ball.velocity.unwrap();
        assert!(v.approx_eq(&Velocity::from_angle_and_speed(300.0, 5.0)));
        assert!(world.events.is_empty());
    }

    #[test]
    fn test_unchanged_velocity_nudges_ball_down() {
        // Known edge case: a rising ball crossing the paddle's top face gets its
        // velocity back unchanged, so the ball is pushed down to escape
        let mut world = World::new();
        let paddle = world.add_paddle(Rectangle::from_coords(350.0, 575.0, 100.0, 20.0));
        let mut ball = Ball::new(BallId(1), Point::new(400.0, 578.0)).with_velocity(Velocity::new(0.0, -5.0));

        let motion = world.step(&mut ball);
        assert!(matches!(motion, Motion::Unstuck { collidable, .. } if collidable == paddle));
        assert_eq!(ball.center, Point::new(400.0, 598.0));
        assert_eq!(ball.velocity, Some(Velocity::new(0.0, -5.0)));
    }

    #[test]
    fn test_removed_block_is_passed_through() {
        let mut world = World::new();
        let block = world.add_block(Rectangle::from_coords(100.0, 100.0, 50.0, 20.0), 1);
        world.colliders.remove(block);
        let mut ball = Ball::new(BallId(1), Point::new(120.0, 97.0)).with_velocity(Velocity::new(1.0, 5.0));

        assert_eq!(world.step(&mut ball), Motion::Free);
        assert_eq!(ball.center, Point::new(121.0, 102.0));
        assert!(world.events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_free_motion_advances_by_velocity(
            x in 0.0f64..800.0,
            y in 0.0f64..600.0,
            dx in -10.0f64..10.0,
            dy in -10.0f64..10.0,
            frames in 1usize..200,
        ) {
            let mut world = World::new();
            let mut ball = Ball::new(BallId(1), Point::new(x, y)).with_velocity(Velocity::new(dx, dy));
            for _ in 0..frames {
                prop_assert_eq!(world.step(&mut ball), Motion::Free);
            }
            prop_assert_eq!(ball.velocity, Some(Velocity::new(dx, dy)));
            let expected = Point::new(x + dx * frames as f64, y + dy * frames as f64);
            prop_assert!(ball.center.distance(expected) < 1e-9);
        }
    }
}
