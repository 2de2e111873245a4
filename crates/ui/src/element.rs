//! Hit-testable UI elements.

use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};
use raypick_camera::Camera;

/// Axis-aligned rectangle in an element's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle ensuring min <= max per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    /// Create a rectangle from center position and size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Whether `point` lies inside the rectangle (edges included).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// World transform of an element, already flattened by the host's hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// World scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `position` with identity rotation and scale.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Direction the element faces: local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local-plane coordinates of a world-space point.
    ///
    /// The point is rotated into the element's frame and divided by scale;
    /// any out-of-plane component is dropped.
    pub fn point_to_local(&self, world: Vec3) -> Vec2 {
        let local = self.rotation.inverse() * (world - self.position);
        Vec2::new(local.x / self.scale.x, local.y / self.scale.y)
    }
}

/// How an element decides whether a contained point actually hits it.
///
/// The custom predicate is consulted only after rectangle containment has
/// passed; it restricts hits to a sub-region of the rectangle.
#[derive(Clone, Default)]
pub enum HitShape {
    /// The whole rectangle is hittable.
    #[default]
    Rectangle,
    /// Arbitrary sub-region: a predicate over the local-space point.
    Custom(Arc<dyn Fn(Vec2) -> bool + Send + Sync>),
}

impl HitShape {
    /// Whether `local` hits, assuming rectangle containment already passed.
    pub fn accepts(&self, local: Vec2) -> bool {
        match self {
            Self::Rectangle => true,
            Self::Custom(test) => test(local),
        }
    }
}

impl fmt::Debug for HitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => f.write_str("Rectangle"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A hit-testable node registered on a surface.
#[derive(Debug, Clone)]
pub struct Element {
    /// Hittable rectangle in local space.
    pub rect: Rect,
    /// World transform.
    pub transform: Transform,
    /// Draw order within the surface; `-1` means not yet drawn and therefore
    /// never hittable.
    pub depth: i32,
    /// Whether the element participates in hit testing.
    pub raycast_target: bool,
    /// Whether the renderer currently culls the element.
    pub culled: bool,
    /// Hit-shape refinement applied after rectangle containment.
    pub hit_shape: HitShape,
}

impl Element {
    /// Element covering `rect` at the identity transform.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            transform: Transform::default(),
            depth: 0,
            raycast_target: true,
            culled: false,
            hit_shape: HitShape::Rectangle,
        }
    }

    /// Builder: set the world transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: set the draw depth.
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Builder: opt out of hit testing.
    pub fn with_raycast_target(mut self, raycast_target: bool) -> Self {
        self.raycast_target = raycast_target;
        self
    }

    /// Builder: mark the element renderer-culled.
    pub fn with_culled(mut self, culled: bool) -> Self {
        self.culled = culled;
        self
    }

    /// Builder: restrict hits to a custom shape.
    pub fn with_hit_shape(mut self, hit_shape: HitShape) -> Self {
        self.hit_shape = hit_shape;
        self
    }

    /// Direction the element faces in world space.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Local-space point under `pointer`, or `None` when the projection
    /// cannot reach the element's plane.
    ///
    /// With a camera the pointer is unprojected and intersected with the
    /// element's plane. Without one the pointer already lives in the same
    /// pixel space as the element and is mapped through the inverse
    /// transform directly.
    pub fn local_hit_point(&self, pointer: Vec2, camera: Option<&Camera>) -> Option<Vec2> {
        match camera {
            None => {
                let world = Vec3::new(pointer.x, pointer.y, self.transform.position.z);
                Some(self.transform.point_to_local(world))
            }
            Some(camera) => {
                let ray = camera.screen_point_to_ray(pointer);
                let normal = self.forward();
                let denom = normal.dot(ray.direction);
                if denom.abs() < 1e-6 {
                    return None;
                }
                let t = normal.dot(self.transform.position - ray.origin) / denom;
                if t < 0.0 {
                    return None;
                }
                Some(self.transform.point_to_local(ray.at(t)))
            }
        }
    }
}
