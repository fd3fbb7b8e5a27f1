//! The player's paddle

use serde::{Deserialize, Serialize};

use super::collidable::CollidableId;
use super::geometry::{Point, Rectangle, approx_eq};
use super::velocity::Velocity;
use crate::consts::*;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    id: CollidableId,
    rect: Rectangle,
    /// Horizontal distance covered per frame of input
    speed: f64,
}

impl Paddle {
    pub fn new(id: CollidableId, rect: Rectangle, speed: f64) -> Self {
        Self { id, rect, speed }
    }

    #[inline]
    pub fn id(&self) -> CollidableId {
        self.id
    }

    #[inline]
    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Horizontal center of the paddle
    pub fn center_x(&self) -> f64 {
        self.rect.left() + self.rect.width() / 2.0
    }

    /// Step left unless that would cross the left border
    pub fn move_left(&mut self) {
        let upper_left = self.rect.upper_left();
        if upper_left.x >= BORDER_THICKNESS + self.speed {
            self.rect
                .set_upper_left(Point::new(upper_left.x - self.speed, upper_left.y));
        }
    }

    /// Step right unless that would cross the right border
    pub fn move_right(&mut self) {
        let upper_left = self.rect.upper_left();
        if self.rect.right() <= SCREEN_WIDTH - BORDER_THICKNESS - self.speed {
            self.rect
                .set_upper_left(Point::new(upper_left.x + self.speed, upper_left.y));
        }
    }

    /// New velocity for a ball striking the paddle at `point`
    ///
    /// Hits on the face the ball approaches from (top when falling, bottom when
    /// rising) are redirected by which fifth of the paddle was struck, keeping
    /// the speed. Hits on the side the ball approaches reverse it entirely.
    /// Anything else leaves the velocity unchanged.
    pub fn hit(&self, point: Point, velocity: Velocity) -> Velocity {
        let rect = &self.rect;

        let face_hit = (velocity.dy > 0.0 && approx_eq(point.y, rect.top()))
            || (velocity.dy < 0.0 && approx_eq(point.y, rect.bottom()));
        if face_hit {
            let angle = self.band_angle(point.x);
            return Velocity::from_angle_and_speed(angle, velocity.speed());
        }

        let side_hit = (velocity.dx > 0.0 && approx_eq(point.x, rect.left()))
            || (velocity.dx < 0.0 && approx_eq(point.x, rect.right()));
        if side_hit {
            return Velocity::new(-velocity.dx, -velocity.dy);
        }

        velocity
    }

    /// Outgoing angle for a face hit at horizontal position `x`
    fn band_angle(&self, x: f64) -> f64 {
        let region = self.rect.width() / PADDLE_REGIONS as f64;
        let left = self.rect.left();
        let last = PADDLE_BAND_ANGLES.len() - 1;
        PADDLE_BAND_ANGLES[..last]
            .iter()
            .enumerate()
            .find(|(i, _)| x <= left + (*i as f64 + 1.0) * region)
            .map(|(_, angle)| *angle)
            .unwrap_or(PADDLE_BAND_ANGLES[last])
    }
}
