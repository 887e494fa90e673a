//! Ray casting against target hit volumes
//!
//! Targets are upright capsules. `CapsuleScene` is the headless stand-in for
//! the browser renderer's raycaster: it mirrors the visible round and answers
//! intersection queries by handle.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Add, Mul, Sub};

use super::resolver::{Intersector, RenderHandle};

/// Capsule radius of a target mesh
pub const TARGET_RADIUS: f32 = 0.3;
/// Length of the straight section between the two hemispheres
pub const TARGET_BODY_LENGTH: f32 = 1.0;

const EPSILON: f32 = 1e-6;

/// Point or direction in gallery space (y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Unit vector in the same direction, or `None` for a zero/non-finite vector
    /// Unit vector along `self`; `None` for zero-length or non-finite input
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if !len.is_finite() || len == 0.0 {
            return None;
        }
        let unit = Vec3::new(self.x / len, self.y / len, self.z / len);
        unit.is_finite().then_some(unit)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// A shot from the crosshair. The direction is always unit length, so
/// intersection parameters are distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Returns `None` when the direction cannot be normalized or the origin is not finite
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.normalized()?;
        Some(Self { origin, direction })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray casting math for target capsules
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Distance along `ray` to the first point of the upright capsule centred
    /// on `center`, or `None` if the ray misses. A ray starting inside the
    /// capsule hits at distance zero.
    pub fn ray_capsule(ray: &Ray, center: Vec3, radius: f32, body_length: f32) -> Option<f32> {
        let half = body_length * 0.5;
        let bottom = Vec3::new(center.x, center.y - half, center.z);
        let top = Vec3::new(center.x, center.y + half, center.z);

        if Self::point_segment_distance(ray.origin(), bottom, top) <= radius {
            return Some(0.0);
        }

        let mut nearest: Option<f32> = None;
        let mut consider = |t: Option<f32>| {
            if let Some(t) = t {
                nearest = Some(nearest.map_or(t, |n: f32| n.min(t)));
            }
        };

        consider(Self::ray_body(ray, center, radius, bottom.y, top.y));
        consider(Self::ray_sphere(ray, bottom, radius));
        consider(Self::ray_sphere(ray, top, radius));

        nearest
    }

    /// Nearest non-negative hit on a sphere
    pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
        let oc = ray.origin() - center;
        let b = oc.dot(ray.direction());
        let c = oc.dot(oc) - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
    }

    /// Nearest non-negative hit on the lateral surface of a vertical cylinder
    /// clipped to `y_min..=y_max`
    fn ray_body(ray: &Ray, center: Vec3, radius: f32, y_min: f32, y_max: f32) -> Option<f32> {
        let d = ray.direction();
        let a = d.x * d.x + d.z * d.z;
        if a < EPSILON {
            // Parallel to the axis; only the caps can be hit
            return None;
        }

        let ox = ray.origin().x - center.x;
        let oz = ray.origin().z - center.z;
        let b = 2.0 * (ox * d.x + oz * d.z);
        let c = ox * ox + oz * oz - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }

        let root = disc.sqrt();
        [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
            .into_iter()
            .filter(|t| *t >= 0.0)
            .find(|t| {
                let y = ray.at(*t).y;
                y >= y_min && y <= y_max
            })
    }

    /// Shortest distance from `point` to the segment `a..b`
    pub fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
        let ab = b - a;
        let len_sq = ab.dot(ab);
        let t = if len_sq < EPSILON {
            0.0
        } else {
            ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
        };
        (point - (a + ab * t)).length()
    }
}

/// Headless scene holding one capsule per visible target
#[derive(Debug, Default)]
pub struct CapsuleScene {
    bodies: HashMap<RenderHandle, Vec3>,
    radius: f32,
    body_length: f32,
}

impl CapsuleScene {
    pub fn new() -> Self {
        Self::with_dimensions(TARGET_RADIUS, TARGET_BODY_LENGTH)
    }

    pub fn with_dimensions(radius: f32, body_length: f32) -> Self {
        Self {
            bodies: HashMap::new(),
            radius,
            body_length,
        }
    }

    /// Replace the scene contents with the given renderables
    pub fn sync<I>(&mut self, renderables: I)
    where
        I: IntoIterator<Item = (RenderHandle, Vec3)>,
    {
        self.bodies.clear();
        self.bodies.extend(renderables);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Intersector for CapsuleScene {
    fn intersect(&self, ray: &Ray, candidates: &[RenderHandle]) -> Vec<(RenderHandle, f32)> {
        let mut hits: Vec<(RenderHandle, f32)> = candidates
            .iter()
            .filter_map(|handle| {
                let center = self.bodies.get(handle)?;
                PhysicsSystem::ray_capsule(ray, *center, self.radius, self.body_length)
                    .map(|distance| (*handle, distance))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}
