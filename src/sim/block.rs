//! Blocks - rectangles the ball breaks (and the borders it bounces off)

use serde::{Deserialize, Serialize};

use super::ball::BallId;
use super::collidable::{CollidableId, HitEvent, HitListener};
use super::geometry::{Point, Rectangle, approx_eq};
use super::velocity::Velocity;

/// A block entity
///
/// Borders and the death region are blocks with zero hit points: they are
/// never destroyed, and what happens on a hit depends only on their listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    id: CollidableId,
    rect: Rectangle,
    hit_points: u32,
    listeners: Vec<HitListener>,
}

impl Block {
    pub fn new(id: CollidableId, rect: Rectangle, hit_points: u32) -> Self {
        Self {
            id,
            rect,
            hit_points,
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> CollidableId {
        self.id
    }

    #[inline]
    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    /// Remaining strikes before the block breaks
    #[inline]
    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn listeners(&self) -> &[HitListener] {
        &self.listeners
    }

    pub fn add_hit_listener(&mut self, listener: HitListener) {
        self.listeners.push(listener);
    }

    /// Detach the first registration of `listener`; false if it was not attached
    pub fn remove_hit_listener(&mut self, listener: HitListener) -> bool {
        match self.listeners.iter().position(|l| *l == listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Bounce off whichever edges `point` lies on, then notify listeners and wear down
    ///
    /// A side hit flips `dx`, a top/bottom hit flips `dy`; a corner flips both.
    /// The event carries the hit points *before* this hit.
    pub fn hit(
        &mut self,
        hitter: BallId,
        point: Point,
        velocity: Velocity,
        events: &mut Vec<HitEvent>,
    ) -> Velocity {
        let mut new_velocity = velocity;

        if approx_eq(point.x, self.rect.left()) || approx_eq(point.x, self.rect.right()) {
            new_velocity.dx = -velocity.dx;
        }
        if approx_eq(point.y, self.rect.top()) || approx_eq(point.y, self.rect.bottom()) {
            new_velocity.dy = -velocity.dy;
        }

        events.push(HitEvent {
            block: self.id,
            hitter,
            hit_points: self.hit_points,
            listeners: self.listeners.clone(),
        });

        self.hit_points = self.hit_points.saturating_sub(1);

        log::debug!(
            "Block {} hit by ball {} at ({:.2}, {:.2}), {} hit points left",
            self.id,
            hitter,
            point.x,
            point.y,
            self.hit_points
        );

        new_velocity
    }
}
