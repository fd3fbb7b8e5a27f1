//! Broad-phase collision query

use serde::{Deserialize, Serialize};

use super::collidable::{CollidableId, Colliders, CollisionInfo};
use super::geometry::Line;

/// The set of collidables currently in play, in registration order
///
/// Holds handles only; the collidables themselves live in [`Colliders`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameEnvironment {
    collidables: Vec<CollidableId>,
}

impl GameEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collidable(&mut self, id: CollidableId) {
        self.collidables.push(id);
    }

    /// Take `id` out of play; false if it was not registered
    pub fn remove_collidable(&mut self, id: CollidableId) -> bool {
        match self.collidables.iter().position(|c| *c == id) {
            Some(index) => {
                self.collidables.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: CollidableId) -> bool {
        self.collidables.contains(&id)
    }

    pub fn collidables(&self) -> &[CollidableId] {
        &self.collidables
    }

    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    /// The collidable `trajectory` strikes first, and where
    ///
    /// Linear scan over every registered collidable. Equal distances go to
    /// the one registered first. The id list cannot change while the query
    /// holds `&self`, so listeners that remove blocks run after it returns.
    pub fn closest_collision(
        &self,
        trajectory: &Line,
        colliders: &Colliders,
    ) -> Option<CollisionInfo> {
        let start = trajectory.start();
        let mut closest: Option<(CollisionInfo, f64)> = None;

        for &id in &self.collidables {
            let Some(collidable) = colliders.get(id) else {
                log::warn!("Collidable {} is registered but no longer exists", id);
                continue;
            };

            let Some(point) =
                trajectory.closest_intersection_to_start_of_line(collidable.collision_rectangle())
            else {
                continue;
            };

            let distance = start.distance(point);
            match closest {
                Some((_, best)) if distance >= best => {}
                _ => {
                    closest = Some((
                        CollisionInfo {
                            point,
                            collidable: id,
                        },
                        distance,
                    ))
                }
            }
        }

        closest.map(|(info, _)| info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::Block;
    use crate::sim::geometry::{Point, Rectangle};

    fn register(env: &mut GameEnvironment, colliders: &mut Colliders, rect: Rectangle) -> CollidableId {
        let id = colliders.insert_block(|id| Block::new(id, rect, 1));
        env.add_collidable(id);
        id
    }

    #[test]
    fn test_miss_returns_none() {
        let mut env = GameEnvironment::new();
        let mut colliders = Colliders::new();
        register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 100.0, 50.0, 20.0));

        let trajectory = Line::from_coords(0.0, 0.0, 50.0, 50.0);
        assert_eq!(env.closest_collision(&trajectory, &colliders), None);
    }

    #[test]
    fn test_empty_environment() {
        let env = GameEnvironment::new();
        let colliders = Colliders::new();
        let trajectory = Line::from_coords(0.0, 0.0, 50.0, 50.0);
        assert_eq!(env.closest_collision(&trajectory, &colliders), None);
        assert!(env.is_empty());
    }

    #[test]
    fn test_nearest_collidable_wins() {
        let mut env = GameEnvironment::new();
        let mut colliders = Colliders::new();
        let far = register(&mut env, &mut colliders, Rectangle::from_coords(300.0, 0.0, 50.0, 100.0));
        let near = register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 0.0, 50.0, 100.0));

        let trajectory = Line::from_coords(0.0, 50.0, 400.0, 50.0);
        let info = env.closest_collision(&trajectory, &colliders).unwrap();
        assert_eq!(info.collidable, near);
        assert_eq!(info.point, Point::new(100.0, 50.0));
        assert_ne!(info.collidable, far);
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let mut env = GameEnvironment::new();
        let mut colliders = Colliders::new();
        // Two blocks sharing the same left edge
        let first = register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 0.0, 50.0, 100.0));
        let _second = register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 0.0, 80.0, 100.0));

        let trajectory = Line::from_coords(0.0, 50.0, 400.0, 50.0);
        let info = env.closest_collision(&trajectory, &colliders).unwrap();
        assert_eq!(info.collidable, first);
    }

    #[test]
    fn test_removed_collidable_is_ignored() {
        let mut env = GameEnvironment::new();
        let mut colliders = Colliders::new();
        let near = register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 0.0, 50.0, 100.0));
        let far = register(&mut env, &mut colliders, Rectangle::from_coords(300.0, 0.0, 50.0, 100.0));

        assert!(env.remove_collidable(near));
        assert!(!env.remove_collidable(near));
        assert!(!env.contains(near));

        let trajectory = Line::from_coords(0.0, 50.0, 400.0, 50.0);
        let info = env.closest_collision(&trajectory, &colliders).unwrap();
        assert_eq!(info.collidable, far);
    }

    #[test]
    fn test_stale_id_is_skipped() {
        let mut env = GameEnvironment::new();
        let mut colliders = Colliders::new();
        let stale = register(&mut env, &mut colliders, Rectangle::from_coords(100.0, 0.0, 50.0, 100.0));
        colliders.remove(stale);

        let trajectory = Line::from_coords(0.0, 50.0, 400.0, 50.0);
        assert_eq!(env.closest_collision(&trajectory, &colliders), None);
        assert_eq!(env.len(), 1);
    }
}
