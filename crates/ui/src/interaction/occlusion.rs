//! Occluder prefiltering against physical collision geometry.

use raypick_camera::{Camera, Ray};
use raypick_collision::{BlockingGeometry, LayerMask};
use serde::{Deserialize, Serialize};

/// Which physical-geometry casts run before UI hits are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingMode {
    /// No physical occlusion.
    #[default]
    None,
    /// Check 2D colliders only.
    TwoD,
    /// Check 3D colliders only.
    ThreeD,
    /// Check both 2D and 3D colliders.
    All,
}

impl BlockingMode {
    fn includes_3d(self) -> bool {
        matches!(self, Self::ThreeD | Self::All)
    }

    fn includes_2d(self) -> bool {
        matches!(self, Self::TwoD | Self::All)
    }
}

/// Distance along `ray` to the nearest physical occluder, or infinity when
/// nothing blocks. UI candidates at or beyond this distance are discarded.
///
/// The casts search no farther than the slice of the ray spanning the
/// camera's clip volume; a ray perpendicular to the view direction searches
/// unbounded.
pub fn blocking_distance(
    mode: BlockingMode,
    mask: LayerMask,
    ray: &Ray,
    camera: &Camera,
    geometry: Option<&dyn BlockingGeometry>,
) -> f32 {
    if mode == BlockingMode::None {
        return f32::INFINITY;
    }
    let Some(geometry) = geometry else {
        return f32::INFINITY;
    };

    let depth = ray.direction.dot(camera.forward());
    let search = if depth.abs() < 1e-6 {
        f32::INFINITY
    } else {
        ((camera.far - camera.near) / depth).abs()
    };

    let mut nearest = f32::INFINITY;
    if mode.includes_3d() {
        if let Some(distance) = geometry.raycast_3d(ray, search, mask) {
            nearest = nearest.min(distance);
        }
    }
    if mode.includes_2d() {
        if let Some(distance) = geometry.raycast_2d(ray, search, mask) {
            nearest = nearest.min(distance);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use raypick_collision::{Aabb, Collider2d, Collider3d, CollisionWorld};

    fn forward_ray() -> Ray {
        Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        }
    }

    fn world_with_box_at(x: f32) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_3d(Collider3d::new(Aabb::from_center_size(
            Vec3::new(x, 0.0, 0.0),
            Vec3::ONE,
        )));
        world
    }

    #[test]
    fn mode_none_and_absent_geometry_never_block() {
        let camera = Camera::default();
        let world = world_with_box_at(5.0);

        let unbounded = blocking_distance(
            BlockingMode::None,
            LayerMask::ALL,
            &forward_ray(),
            &camera,
            Some(&world),
        );
        assert_eq!(unbounded, f32::INFINITY);

        let absent = blocking_distance(
            BlockingMode::All,
            LayerMask::ALL,
            &forward_ray(),
            &camera,
            None,
        );
        assert_eq!(absent, f32::INFINITY);
    }

    #[test]
    fn three_d_mode_reports_nearest_box() {
        let camera = Camera::default(); // looks down +X
        let world = world_with_box_at(5.0);

        let distance = blocking_distance(
            BlockingMode::ThreeD,
            LayerMask::ALL,
            &forward_ray(),
            &camera,
            Some(&world),
        );
        assert!((distance - 4.5).abs() < 1e-3);
    }

    #[test]
    fn minimum_of_both_casts_wins() {
        let camera = Camera::default().with_orientation(-std::f32::consts::FRAC_PI_2, 0.0);
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };

        let mut world = CollisionWorld::new();
        world.add_3d(Collider3d::new(Aabb::from_center_size(
            Vec3::new(0.0, 0.0, -8.0),
            Vec3::ONE,
        )));
        world.add_2d(Collider2d::new(Vec2::splat(-2.0), Vec2::splat(2.0), -3.0));

        let distance =
            blocking_distance(BlockingMode::All, LayerMask::ALL, &ray, &camera, Some(&world));
        assert!((distance - 3.0).abs() < 1e-3);

        let three_d_only = blocking_distance(
            BlockingMode::ThreeD,
            LayerMask::ALL,
            &ray,
            &camera,
            Some(&world),
        );
        assert!((three_d_only - 7.5).abs() < 1e-3);
    }

    #[test]
    fn clip_volume_caps_the_search() {
        // Far plane at 3: the box at 5 is outside the searchable slice.
        let camera = Camera::default().with_clip_planes(0.1, 3.0);
        let world = world_with_box_at(5.0);

        let distance = blocking_distance(
            BlockingMode::ThreeD,
            LayerMask::ALL,
            &forward_ray(),
            &camera,
            Some(&world),
        );
        assert_eq!(distance, f32::INFINITY);
    }

    #[test]
    fn perpendicular_ray_searches_unbounded() {
        // Ray at 90 degrees to the view direction.
        let camera = Camera::default(); // forward +X
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Y,
        };
        let mut world = CollisionWorld::new();
        world.add_3d(Collider3d::new(Aabb::from_center_size(
            Vec3::new(0.0, 2000.0, 0.0),
            Vec3::ONE,
        )));

        let distance = blocking_distance(
            BlockingMode::ThreeD,
            LayerMask::ALL,
            &ray,
            &camera,
            Some(&world),
        );
        assert!(distance.is_finite());
    }
}
