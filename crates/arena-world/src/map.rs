//! Obstacle storage and the nearest-hit query.

use arena_core::collab::{GeometryQuery, ObstacleHit};
use arena_core::types::{ObstacleId, Ray};

use crate::intersect::{ray_aabb, ray_face, Aabb, Face};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box(Aabb),
    /// Teleporter face (a link source once registered in a `LinkTable`).
    Face(Face),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub shape: Shape,
}

/// Flat list of world obstacles. Ids are assigned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ArenaMap {
    obstacles: Vec<Obstacle>,
}

impl ArenaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_box(&mut self, aabb: Aabb) -> ObstacleId {
        self.push(Shape::Box(aabb))
    }

    pub fn add_face(&mut self, face: Face) -> ObstacleId {
        self.push(Shape::Face(face))
    }

    fn push(&mut self, shape: Shape) -> ObstacleId {
        let id = ObstacleId(self.obstacles.len() as u32);
        self.obstacles.push(Obstacle { id, shape });
        id
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.0 as usize)
    }

    pub fn face(&self, id: ObstacleId) -> Option<&Face> {
        match self.get(id)?.shape {
            Shape::Face(ref face) => Some(face),
            Shape::Box(_) => None,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

impl GeometryQuery for ArenaMap {
    fn first_hit(&self, ray: &Ray, epsilon: f32, horizon: f32) -> Option<ObstacleHit> {
        let mut best: Option<ObstacleHit> = None;
        for obstacle in &self.obstacles {
            let t = match obstacle.shape {
                Shape::Box(ref aabb) => ray_aabb(ray, aabb, epsilon, horizon),
                Shape::Face(ref face) => ray_face(ray, face, epsilon, horizon),
            };
            if let Some(time) = t {
                // ties go to the earlier obstacle
                if best.map_or(true, |b| time < b.time) {
                    best = Some(ObstacleHit {
                        obstacle: obstacle.id,
                        time,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_first_hit_picks_nearest() {
        let mut map = ArenaMap::new();
        let far = map.add_box(Aabb::new(Vec3::new(20.0, -1.0, 0.0), Vec3::new(22.0, 1.0, 5.0)));
        let near = map.add_box(Aabb::new(Vec3::new(10.0, -1.0, 0.0), Vec3::new(12.0, 1.0, 5.0)));
        assert_ne!(far, near);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 0.0, 0.0));
        let hit = map.first_hit(&ray, 1e-5, 5.0).unwrap();
        assert_eq!(hit.obstacle, near);
        assert!((hit.time - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_first_hit_respects_horizon() {
        let mut map = ArenaMap::new();
        map.add_box(Aabb::new(Vec3::new(10.0, -1.0, 0.0), Vec3::new(12.0, 1.0, 5.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 0.0, 0.0));
        assert!(map.first_hit(&ray, 1e-5, 0.5).is_none());
    }

    #[test]
    fn test_face_lookup() {
        let mut map = ArenaMap::new();
        let b = map.add_box(Aabb::new(Vec3::ZERO, Vec3::ONE));
        let f = map.add_face(Face::new(Vec3::ZERO, Vec3::X, Vec3::Y, Vec2::ONE));
        assert!(map.face(b).is_none());
        assert!(map.face(f).is_some());
        assert!(map.get(ObstacleId(99)).is_none());
        assert_eq!(map.obstacles().len(), 2);
    }
}
