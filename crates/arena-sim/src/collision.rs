//! Obstacle, teleporter and tank contact tests along a flight ray.

use glam::Vec3;

use arena_core::collab::{LinkIdentity, LinkRoute, LinkSource};
use arena_core::constants::EPSILON;
use arena_core::types::Ray;

use crate::context::WorldView;
use crate::history::SegmentHistory;

/// What a flight step ran into. Times are seconds from the step's start.
#[derive(Debug, Clone, PartialEq)]
pub enum Collision {
    Clear,
    /// Reached z <= 0.
    Ground { time: f32 },
    /// Hit a solid obstacle, or a teleporter that refused the shot.
    Blocked {
        time: f32,
        point: Vec3,
        refused: Option<LinkSource>,
    },
    /// Entered a teleporter and left through `route.dst`.
    Teleported { time: f32, route: LinkRoute },
}

impl Collision {
    pub fn time(&self) -> Option<f32> {
        match *self {
            Collision::Clear => None,
            Collision::Ground { time }
            | Collision::Blocked { time, .. }
            | Collision::Teleported { time, .. } => Some(time),
        }
    }

    /// Whether the shot survives this step.
    pub fn survives(&self) -> bool {
        matches!(self, Collision::Clear | Collision::Teleported { .. })
    }
}

/// Look up the first obstacle along `ray` within `horizon` seconds.
///
/// Teleporter entries are resolved with `identity` so every peer picks the
/// same exit. `pos`/`vel` are the shot state handed to the link resolver.
pub fn probe_obstacles(
    world: &WorldView<'_>,
    ray: &Ray,
    horizon: f32,
    identity: &LinkIdentity,
    pos: Vec3,
    vel: Vec3,
) -> Collision {
    let Some(hit) = world.geometry.first_hit(ray, EPSILON, horizon) else {
        return Collision::Clear;
    };

    let refused = match world.links.classify(hit.obstacle) {
        Some(source) => match world.links.resolve_destination(&source, identity, pos, vel) {
            Some(route) => {
                return Collision::Teleported {
                    time: hit.time,
                    route,
                }
            }
            None => Some(source),
        },
        None => None,
    };

    Collision::Blocked {
        time: hit.time,
        point: ray.point_at(hit.time),
        refused,
    }
}

/// Sphere a shot can hit (a tank's bounding volume).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotCollider {
    pub position: Vec3,
    pub radius: f32,
}

/// Earliest contact between a shot and a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotHit {
    /// Absolute simulation time of contact.
    pub time: f64,
    pub position: Vec3,
}

/// First time any history segment passes within `shot_radius` of `collider`.
pub fn earliest_contact(
    history: &SegmentHistory,
    collider: &ShotCollider,
    shot_radius: f32,
) -> Option<ShotHit> {
    let reach = collider.radius + shot_radius;
    let mut best: Option<ShotHit> = None;

    for segment in history.iter() {
        let duration = segment.duration();
        if duration < 0.0 {
            continue;
        }
        let Some(t) = sphere_entry(&segment.ray, collider.position, reach, duration) else {
            continue;
        };
        let time = segment.start + f64::from(t);
        if best.map_or(true, |b| time < b.time) {
            best = Some(ShotHit {
                time,
                position: segment.ray.point_at(t),
            });
        }
    }
    best
}

/// Smallest `t` in `[0, max_t]` with `|ray(t) - center| <= radius`.
fn sphere_entry(ray: &Ray, center: Vec3, radius: f32, max_t: f32) -> Option<f32> {
    let w = ray.origin - center;
    let c = w.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = ray.direction.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * w.dot(ray.direction);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    (0.0..=max_t).contains(&t).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::types::TrajectorySegment;

    #[test]
    fn test_sphere_entry_ahead() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        let t = sphere_entry(&ray, Vec3::new(5.0, 0.0, 0.0), 1.0, 1.0).unwrap();
        assert!((t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_entry_out_of_range() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(sphere_entry(&ray, Vec3::new(5.0, 0.0, 0.0), 1.0, 0.3).is_none());
        assert!(sphere_entry(&ray, Vec3::new(5.0, 3.0, 0.0), 1.0, 1.0).is_none());
    }

    #[test]
    fn test_earliest_contact_prefers_oldest_time() {
        let mut history = SegmentHistory::filled(TrajectorySegment::new(
            0.0,
            0.0,
            Ray::new(Vec3::new(-100.0, 0.0, 1.0), Vec3::X),
        ));
        let first = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 0.0, 0.0));
        let second = Ray::new(first.point_at(1.0), first.direction);
        history.push_front(TrajectorySegment::new(1.0, 2.0, first));
        history.push_front(TrajectorySegment::new(2.0, 3.0, second));

        let collider = ShotCollider {
            position: Vec3::new(9.0, 0.0, 1.0),
            radius: 2.0,
        };
        let hit = earliest_contact(&history, &collider, 0.5).unwrap();
        // enters at x = 9 - 2.5 = 6.5, during the first segment
        assert!((hit.time - 1.65).abs() < 1e-4, "time = {}", hit.time);
        assert!((hit.position.x - 6.5).abs() < 1e-4);
    }
}
