//! Collidable entities and the registry that owns them
//!
//! Everything a ball can strike lives in [`Colliders`], addressed by
//! [`CollidableId`]. The environment, listeners and balls hold ids, never
//! references, so nothing in the simulation points back at its owner.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ball::BallId;
use super::block::Block;
use super::geometry::{Point, Rectangle};
use super::paddle::Paddle;
use super::velocity::Velocity;

/// Handle to an entry in [`Colliders`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollidableId(pub u32);

impl fmt::Display for CollidableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reactions a block can trigger when struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitListener {
    /// Removes the block once its last hit point is used up
    BlockRemover,
    /// Awards points for hits and destruction
    ScoreTracker,
    /// Takes the hitting ball out of play (death region)
    BallRemover,
}

/// Notification emitted by a block when a ball strikes it
#[derive(Debug, Clone, PartialEq)]
pub struct HitEvent {
    pub block: CollidableId,
    pub hitter: BallId,
    /// Hit points the block had before this hit
    pub hit_points: u32,
    /// Listeners attached at the time of the hit
    pub listeners: Vec<HitListener>,
}

/// Something with a rectangular boundary that produces a new velocity on impact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Collidable {
    Block(Block),
    Paddle(Paddle),
}

impl Collidable {
    pub fn id(&self) -> CollidableId {
        match self {
            Collidable::Block(block) => block.id(),
            Collidable::Paddle(paddle) => paddle.id(),
        }
    }

    pub fn collision_rectangle(&self) -> &Rectangle {
        match self {
            Collidable::Block(block) => block.rect(),
            Collidable::Paddle(paddle) => paddle.rect(),
        }
    }

    /// Velocity after `hitter` strikes this object at `point`
    pub fn hit(
        &mut self,
        hitter: BallId,
        point: Point,
        velocity: Velocity,
        events: &mut Vec<HitEvent>,
    ) -> Velocity {
        match self {
            Collidable::Block(block) => block.hit(hitter, point, velocity, events),
            Collidable::Paddle(paddle) => paddle.hit(point, velocity),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Collidable::Block(block) => Some(block),
            Collidable::Paddle(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Collidable::Block(block) => Some(block),
            Collidable::Paddle(_) => None,
        }
    }

    pub fn as_paddle(&self) -> Option<&Paddle> {
        match self {
            Collidable::Paddle(paddle) => Some(paddle),
            Collidable::Block(_) => None,
        }
    }

    pub fn as_paddle_mut(&mut self) -> Option<&mut Paddle> {
        match self {
            Collidable::Paddle(paddle) => Some(paddle),
            Collidable::Block(_) => None,
        }
    }
}

/// Result of a broad-phase query: where the trajectory first meets what
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub point: Point,
    pub collidable: CollidableId,
}

/// Owner of every live collidable (sorted by id)
///
/// Only built through [`Colliders::new`] and the insert methods, which keep
/// entries in id order and never hand out an id twice.
#[derive(Debug, Clone)]
pub struct Colliders {
    entries: Vec<Collidable>,
    next_id: u32,
}

impl Default for Colliders {
    fn default() -> Self {
        Self::new()
    }
}

impl Colliders {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh id for an entity about to be inserted
    pub fn next_entity_id(&mut self) -> CollidableId {
        let id = CollidableId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a block built with `build`, which receives the allocated id
    pub fn insert_block(&mut self, build: impl FnOnce(CollidableId) -> Block) -> CollidableId {
        let id = self.next_entity_id();
        self.entries.push(Collidable::Block(build(id)));
        id
    }

    /// Register a paddle built with `build`, which receives the allocated id
    pub fn insert_paddle(&mut self, build: impl FnOnce(CollidableId) -> Paddle) -> CollidableId {
        let id = self.next_entity_id();
        self.entries.push(Collidable::Paddle(build(id)));
        id
    }

    fn index_of(&self, id: CollidableId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |c| c.id()).ok()
    }

    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.index_of(id).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: CollidableId) -> Option<&mut Collidable> {
        self.index_of(id).map(move |i| &mut self.entries[i])
    }

    pub fn remove(&mut self, id: CollidableId) -> Option<Collidable> {
        self.index_of(id).map(|i| self.entries.remove(i))
    }

    pub fn contains(&self, id: CollidableId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collidable> {
        self.entries.iter()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entries.iter().filter_map(Collidable::as_block)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
