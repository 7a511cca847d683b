//! Ray intersection against obstacle shapes.
//!
//! Ray parameters are flight times because ray directions carry the full
//! velocity.

use glam::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use arena_core::types::Ray;

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// One-sided rectangular face. Only rays travelling against `normal` hit it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub center: Vec3,
    pub normal: Vec3,
    /// In-plane axis of the `half_extents.x` side.
    pub u_axis: Vec3,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl Face {
    /// Build a face, normalizing `normal` and making `u_axis` orthogonal to it.
    pub fn new(center: Vec3, normal: Vec3, u_axis: Vec3, half_extents: Vec2) -> Self {
        let normal = normal.normalize_or_zero();
        let u_axis = (u_axis - normal * u_axis.dot(normal)).normalize_or_zero();
        Self {
            center,
            normal,
            u_axis,
            half_extents,
        }
    }

    pub fn v_axis(&self) -> Vec3 {
        self.normal.cross(self.u_axis)
    }

    /// Orthonormal frame (u, v, normal) as matrix columns.
    pub fn frame(&self) -> Mat3 {
        Mat3::from_cols(self.u_axis, self.v_axis(), self.normal)
    }
}

/// Entry time of `ray` into `aabb` within `[epsilon, horizon]`.
///
/// A ray that starts inside the box hits it at `epsilon`.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb, epsilon: f32, horizon: f32) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        // started inside
        return Some(epsilon);
    }
    (t_enter >= epsilon && t_enter <= horizon).then_some(t_enter)
}

/// Time at which `ray` crosses the front of `face` within `[epsilon, horizon]`.
pub fn ray_face(ray: &Ray, face: &Face, epsilon: f32, horizon: f32) -> Option<f32> {
    let denom = ray.direction.dot(face.normal);
    if denom >= 0.0 {
        return None;
    }
    let t = (face.center - ray.origin).dot(face.normal) / denom;
    if t < epsilon || t > horizon {
        return None;
    }
    let local = ray.point_at(t) - face.center;
    let inside = local.dot(face.u_axis).abs() <= face.half_extents.x
        && local.dot(face.v_axis()).abs() <= face.half_extents.y;
    inside.then_some(t)
}
