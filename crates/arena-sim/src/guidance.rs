//! Seeker steering and the kinematic step shared by update and prediction.
//!
//! Both the live tick and the predictor call `step_kinematics`, so a
//! prediction is exactly what the next tick would do given the same inputs.

use glam::{Quat, Vec3};

use arena_core::collab::LinkIdentity;
use arena_core::constants::PARALLEL_EPSILON;
use arena_core::types::Ray;

use crate::collision::{probe_obstacles, Collision};
use crate::context::WorldView;

/// Turn `vel` toward `aim` by at most `max_turn_rate * dt` radians.
///
/// The result has magnitude `speed`. When the target is ahead the turn
/// stops at alignment; when it is behind (non-positive dot product) the full
/// turn is applied. A target dead astern is turned away from about an
/// arbitrary but deterministic perpendicular axis. A target dead ahead, or
/// a degenerate direction, leaves `vel` untouched.
pub fn turn_toward(vel: Vec3, from: Vec3, aim: Vec3, speed: f32, max_turn_rate: f32, dt: f32) -> Vec3 {
    let desired = (aim - from).normalize_or_zero();
    let current = vel.normalize_or_zero();
    if desired == Vec3::ZERO || current == Vec3::ZERO {
        return vel;
    }

    let cross = current.cross(desired);
    let cross_len = cross.length();
    let dot = current.dot(desired);

    let axis = if cross_len > PARALLEL_EPSILON {
        cross / cross_len
    } else if dot < 0.0 {
        current.any_orthonormal_vector()
    } else {
        return vel;
    };

    let needed = cross_len.min(1.0).asin();
    let mut radians = max_turn_rate * dt;
    if radians > needed && dot > 0.0 {
        radians = needed;
    }

    (Quat::from_axis_angle(axis, radians) * vel).normalize() * speed
}

/// Kinematic inputs to one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub speed: f32,
    pub max_turn_rate: f32,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicStep {
    /// Ray flown this step, from the pre-step position along the steered
    /// velocity.
    pub ray: Ray,
    /// Position at the end of the step: the impact point when the shot hit
    /// something, the exit-side position after a teleport.
    pub pos: Vec3,
    pub vel: Vec3,
    pub collision: Collision,
}

/// Steer toward `aim`, advance `dt` seconds and test the path.
///
/// Without a `world` only the ground is checked.
pub fn step_kinematics(
    state: &KinematicState,
    aim: Option<Vec3>,
    dt: f32,
    world: Option<&WorldView<'_>>,
    identity: &LinkIdentity,
) -> KinematicStep {
    let vel = match aim {
        Some(aim) => turn_toward(state.vel, state.pos, aim, state.speed, state.max_turn_rate, dt),
        None => state.vel,
    };
    let ray = Ray::new(state.pos, vel);
    let pos = ray.point_at(dt);

    if pos.z <= 0.0 {
        let drop = ray.origin.z - pos.z;
        let fraction = if drop > 0.0 {
            (ray.origin.z / drop).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let time = fraction * dt;
        return KinematicStep {
            ray,
            pos: ray.point_at(time),
            vel,
            collision: Collision::Ground { time },
        };
    }

    let collision = match world {
        Some(world) => probe_obstacles(world, &ray, dt, identity, pos, vel),
        None => Collision::Clear,
    };

    let (pos, vel) = match &collision {
        Collision::Teleported { route, .. } => route.teleport(pos, vel),
        Collision::Blocked { point, .. } => (*point, vel),
        Collision::Clear | Collision::Ground { .. } => (pos, vel),
    };

    KinematicStep {
        ray,
        pos,
        vel,
        collision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::enums::{FlagType, TeamColor};
    use std::f32::consts::FRAC_PI_2;

    const SPEED: f32 = 120.0;

    fn identity() -> LinkIdentity {
        LinkIdentity {
            seed: 0,
            team: TeamColor::Red,
            flag: FlagType::GuidedMissile,
        }
    }

    fn angle_between(a: Vec3, b: Vec3) -> f32 {
        a.normalize().dot(b.normalize()).clamp(-1.0, 1.0).acos()
    }

    #[test]
    fn test_target_dead_ahead_is_not_steered() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        for dt in [0.01, 0.5, 10.0] {
            let out = turn_toward(vel, Vec3::ZERO, Vec3::new(500.0, 0.0, 0.0), SPEED, 0.6, dt);
            assert_eq!(out, vel);
        }
    }

    #[test]
    fn test_turn_is_rate_limited() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        let aim = Vec3::new(0.0, 100.0, 0.0); // 90 degrees left
        let out = turn_toward(vel, Vec3::ZERO, aim, SPEED, 0.5, 0.1);
        assert!((angle_between(vel, out) - 0.05).abs() < 1e-4);
        assert!(out.y > 0.0, "should turn toward the target");
        assert!((out.length() - SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_turn_does_not_overshoot_target_ahead() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        let aim = Vec3::new(100.0, 10.0, 0.0);
        let needed = angle_between(vel, aim);
        let out = turn_toward(vel, Vec3::ZERO, aim, SPEED, 10.0, 1.0);
        assert!((angle_between(vel, out) - needed).abs() < 1e-4);
        assert!(angle_between(out, aim) < 1e-3);
    }

    #[test]
    fn test_target_behind_turns_full_rate() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        // behind and slightly to the side: sin of the angle is small,
        // but the overshoot clamp must not apply
        let aim = Vec3::new(-100.0, 1.0, 0.0);
        let out = turn_toward(vel, Vec3::ZERO, aim, SPEED, 0.5, 1.0);
        assert!((angle_between(vel, out) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_target_dead_astern_turns_full_rate() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        let out = turn_toward(vel, Vec3::ZERO, Vec3::new(-100.0, 0.0, 0.0), SPEED, 0.5, 1.0);
        assert!((angle_between(vel, out) - 0.5).abs() < 1e-4);
        assert!((out.length() - SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_large_dt_behind_can_pass_ninety_degrees() {
        let vel = Vec3::new(SPEED, 0.0, 0.0);
        let aim = Vec3::new(-100.0, 20.0, 0.0);
        let out = turn_toward(vel, Vec3::ZERO, aim, SPEED, 1.0, 2.0);
        assert!(angle_between(vel, out) > FRAC_PI_2);
    }

    #[test]
    fn test_ground_impact_is_interpolated() {
        let state = KinematicState {
            pos: Vec3::new(0.0, 0.0, 2.0),
            vel: Vec3::new(10.0, 0.0, -4.0),
            speed: 10.0,
            max_turn_rate: 0.0,
        };
        let step = step_kinematics(&state, None, 1.0, None, &identity());
        assert_eq!(step.collision, Collision::Ground { time: 0.5 });
        assert_eq!(step.pos, step.ray.point_at(0.5));
        assert_eq!(step.pos, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_clear_step_without_world() {
        let state = KinematicState {
            pos: Vec3::new(0.0, 0.0, 5.0),
            vel: Vec3::new(10.0, 0.0, 0.0),
            speed: 10.0,
            max_turn_rate: 0.0,
        };
        let step = step_kinematics(&state, None, 0.5, None, &identity());
        assert_eq!(step.collision, Collision::Clear);
        assert_eq!(step.pos, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(step.vel, state.vel);
    }
}
