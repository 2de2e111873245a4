#![warn(missing_docs)]
//! Physical collision geometry that can occlude UI hits.
//!
//! The raycast pipeline never owns collision state; it issues read-only
//! nearest-hit queries through [`BlockingGeometry`]. [`CollisionWorld`] is a
//! reference implementation over axis-aligned boxes and flat 2D rects.

use glam::{Vec2, Vec3};
use raypick_camera::Ray;

bitflags::bitflags! {
    /// Collision layers a collider belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LayerMask: u32 {
        /// Layer 0, where colliders land unless placed elsewhere.
        const DEFAULT = 1;
    }
}

impl LayerMask {
    /// Mask matching every layer, named or not.
    pub const ALL: Self = Self::from_bits_retain(u32::MAX);

    /// Mask with only layer `index` (0..32) set.
    pub fn layer(index: u32) -> Self {
        Self::from_bits_retain(1 << index)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<u32> for LayerMask {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Create an AABB from center position and size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Distance along `ray` to this box, if the ray intersects it.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = ray.direction.recip();

        let t1 = (self.min.x - ray.origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray.origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray.origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray.origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray.origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray.origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Box entirely behind the ray origin.
        if tmax < 0.0 {
            return None;
        }

        if tmin > tmax {
            return None;
        }

        // tmin < 0 means the origin is inside the box.
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// A 3D collider: an AABB on some collision layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider3d {
    /// Collision volume.
    pub aabb: Aabb,
    /// Layers the collider occupies.
    pub layers: LayerMask,
}

impl Collider3d {
    /// Collider on the default layer.
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            layers: LayerMask::DEFAULT,
        }
    }

    /// Builder: place the collider on `layers`.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
}

/// A flat 2D collider: an axis-aligned rect lying in the plane `z = const`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider2d {
    /// Minimum corner in the XY plane.
    pub min: Vec2,
    /// Maximum corner in the XY plane.
    pub max: Vec2,
    /// World Z of the plane the rect lies in.
    pub z: f32,
    /// Layers the collider occupies.
    pub layers: LayerMask,
}

impl Collider2d {
    /// Collider on the default layer.
    pub fn new(min: Vec2, max: Vec2, z: f32) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self {
            min,
            max,
            z,
            layers: LayerMask::DEFAULT,
        }
    }

    /// Builder: place the collider on `layers`.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Distance along `ray` to the rect, if the ray crosses its plane inside
    /// the rect bounds.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        if ray.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = (self.z - ray.origin.z) / ray.direction.z;
        if t < 0.0 {
            return None;
        }
        let hit = ray.at(t);
        if hit.x < self.min.x || hit.x > self.max.x || hit.y < self.min.y || hit.y > self.max.y {
            return None;
        }
        Some(t)
    }
}

/// Read-only raycast queries against externally owned collision state.
///
/// Both casts default to "no hit" so hosts lacking one (or both) kinds of
/// physics skip the corresponding blocking check instead of erroring.
pub trait BlockingGeometry {
    /// Nearest 3D hit distance along `ray` within `max_distance`, restricted
    /// to colliders matching `mask`.
    fn raycast_3d(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<f32> {
        let _ = (ray, max_distance, mask);
        None
    }

    /// Nearest 2D hit distance along `ray` within `max_distance`, restricted
    /// to colliders matching `mask`.
    fn raycast_2d(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<f32> {
        let _ = (ray, max_distance, mask);
        None
    }
}

/// Reference [`BlockingGeometry`] implementation over collider lists.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    colliders_3d: Vec<Collider3d>,
    colliders_2d: Vec<Collider2d>,
}

impl CollisionWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a 3D collider.
    pub fn add_3d(&mut self, collider: Collider3d) {
        self.colliders_3d.push(collider);
    }

    /// Add a 2D collider.
    pub fn add_2d(&mut self, collider: Collider2d) {
        self.colliders_2d.push(collider);
    }

    /// Number of colliders of both kinds.
    pub fn len(&self) -> usize {
        self.colliders_3d.len() + self.colliders_2d.len()
    }

    /// Whether the world has no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders_3d.is_empty() && self.colliders_2d.is_empty()
    }
}

impl BlockingGeometry for CollisionWorld {
    fn raycast_3d(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<f32> {
        nearest(
            self.colliders_3d
                .iter()
                .filter(|c| mask.intersects(c.layers))
                .filter_map(|c| c.aabb.ray_intersection(ray)),
            max_distance,
        )
    }

    fn raycast_2d(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<f32> {
        nearest(
            self.colliders_2d
                .iter()
                .filter(|c| mask.intersects(c.layers))
                .filter_map(|c| c.ray_intersection(ray)),
            max_distance,
        )
    }
}

fn nearest(hits: impl Iterator<Item = f32>, max_distance: f32) -> Option<f32> {
    hits.filter(|&t| t <= max_distance)
        .fold(None, |best, t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        })
}
