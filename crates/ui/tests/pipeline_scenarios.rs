//! End-to-end raycast scenarios across the whole pipeline: viewport mapping,
//! display isolation, occlusion, back-face rejection, and ranking.

use std::f32::consts::FRAC_PI_2;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};
use raypick_camera::Camera;
use raypick_collision::{Aabb, Collider2d, Collider3d, CollisionWorld, LayerMask};
use raypick_display::{Display, DisplayTopology, SpanRouter};
use raypick_ui::{
    BlockingMode, Element, ElementRegistry, HitShape, PointerPipeline, PointerQuery, Rect,
    RenderMode, Surface, Transform,
};

fn overlay_pipeline() -> PointerPipeline {
    PointerPipeline::new(DisplayTopology::single(1920, 1080)).unwrap()
}

/// Overlay element centered at a screen position.
fn screen_element(x: f32, y: f32, size: f32) -> Element {
    Element::new(Rect::from_center_size(Vec2::ZERO, Vec2::splat(size)))
        .with_transform(Transform::new(Vec3::new(x, y, 0.0)))
}

/// Element facing a camera at the origin that looks down +X.
fn facing_element(x: f32, size: f32) -> Element {
    Element::new(Rect::from_center_size(Vec2::ZERO, Vec2::splat(size))).with_transform(
        Transform::new(Vec3::new(x, 0.0, 0.0)).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
    )
}

fn forward_camera() -> Camera {
    Camera::default().with_viewport(1280, 720)
}

fn world_pipeline(camera: Camera) -> PointerPipeline {
    PointerPipeline::new(DisplayTopology::single(1280, 720))
        .unwrap()
        .with_primary_camera(camera)
}

const CENTER: Vec2 = Vec2::new(640.0, 360.0);

#[test]
fn overlapping_overlay_elements_return_topmost_first() {
    let mut pipeline = overlay_pipeline();
    let surface = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();

    let mut registry = ElementRegistry::new();
    let bottom = registry.register(surface, screen_element(50.0, 50.0, 100.0).with_depth(0));
    let top = registry.register(surface, screen_element(50.0, 50.0, 100.0).with_depth(1));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(50.0, 50.0)));

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].element, top);
    assert_eq!(hits[1].element, bottom);
    assert!(hits.iter().all(|hit| hit.distance == 0.0));
}

#[test]
fn pointer_outside_viewport_short_circuits() {
    let mut pipeline = overlay_pipeline();
    let surface = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();

    // The custom shape doubles as a probe: it records whether the element
    // pass ever ran.
    let probed = Arc::new(AtomicBool::new(false));
    let probe = Arc::clone(&probed);
    let element = screen_element(50.0, 50.0, 100.0).with_hit_shape(HitShape::Custom(Arc::new(
        move |_| {
            probe.store(true, Ordering::Relaxed);
            true
        },
    )));

    let mut registry = ElementRegistry::new();
    registry.register(surface, element);

    // (2880, 540) normalizes to viewport x = 1.5.
    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(2880.0, 540.0)));
    assert!(hits.is_empty());
    assert!(!probed.load(Ordering::Relaxed), "candidates were evaluated");
}

#[test]
fn point_outside_rect_never_hits() {
    let mut pipeline = overlay_pipeline();
    let surface = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(surface, screen_element(100.0, 100.0, 10.0));
    let wide = registry.register(surface, screen_element(200.0, 200.0, 500.0));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(200.0, 200.0)));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].element, wide);
}

#[test]
fn display_mismatch_yields_zero_hits() {
    let topology = DisplayTopology::new(vec![Display::new(1000, 1000), Display::new(500, 500)]);
    let mut pipeline = PointerPipeline::new(topology).unwrap();
    let surface = pipeline
        .add_surface(Surface::new(RenderMode::Overlay).with_target_display(1))
        .unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(surface, screen_element(250.0, 250.0, 100.0));

    let on_primary = PointerQuery::at(Vec2::new(250.0, 250.0)).on_display(0);
    assert!(pipeline.raycast_all(&registry, &on_primary).is_empty());

    let on_secondary = PointerQuery::at(Vec2::new(250.0, 250.0)).on_display(1);
    assert_eq!(pipeline.raycast_all(&registry, &on_secondary).len(), 1);
}

#[test]
fn span_router_isolates_displays() {
    let topology = DisplayTopology::new(vec![Display::new(1000, 1000), Display::new(500, 500)]);
    let router = SpanRouter::new(topology.clone());
    let mut pipeline = PointerPipeline::new(topology).unwrap().with_router(router);

    let primary = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();
    let secondary = pipeline
        .add_surface(Surface::new(RenderMode::Overlay).with_target_display(1))
        .unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(primary, screen_element(200.0, 100.0, 50.0));
    let target = registry.register(secondary, screen_element(200.0, 100.0, 50.0));

    // Raw x=1200 resolves to display 1, local (200, 100).
    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(1200.0, 100.0)));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].element, target);
    assert_eq!(hits[0].screen_position, Vec2::new(200.0, 100.0));
}

#[test]
fn three_d_occluder_blocks_farther_elements() {
    let mut world = CollisionWorld::new();
    world.add_3d(Collider3d::new(Aabb::from_center_size(
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::ONE,
    )));

    let mut pipeline = world_pipeline(forward_camera()).with_blocking_geometry(world);
    let surface = pipeline
        .add_surface(
            Surface::new(RenderMode::Camera).with_blocking(BlockingMode::ThreeD, LayerMask::ALL),
        )
        .unwrap();

    let mut registry = ElementRegistry::new();
    // Element at distance 10, occluder at ~4.5.
    registry.register(surface, facing_element(10.0, 4.0));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(CENTER));
    assert!(hits.is_empty());
}

#[test]
fn element_in_front_of_occluder_still_hits() {
    let mut world = CollisionWorld::new();
    world.add_3d(Collider3d::new(Aabb::from_center_size(
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::ONE,
    )));

    let mut pipeline = world_pipeline(forward_camera()).with_blocking_geometry(world);
    let surface = pipeline
        .add_surface(
            Surface::new(RenderMode::Camera).with_blocking(BlockingMode::ThreeD, LayerMask::ALL),
        )
        .unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(surface, facing_element(10.0, 4.0));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(CENTER));
    assert_eq!(hits.len(), 1);
    assert!((hits[0].distance - 10.0).abs() < 1e-3);
}

#[test]
fn blocking_mode_none_ignores_occluders() {
    let mut world = CollisionWorld::new();
    world.add_3d(Collider3d::new(Aabb::from_center_size(
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::ONE,
    )));

    let mut pipeline = world_pipeline(forward_camera()).with_blocking_geometry(world);
    let surface = pipeline.add_surface(Surface::new(RenderMode::World)).unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(surface, facing_element(10.0, 4.0));

    assert_eq!(pipeline.raycast_all(&registry, &PointerQuery::at(CENTER)).len(), 1);
}

#[test]
fn two_d_occluder_respects_layer_mask() {
    // Camera looking down -Z so the ray can cross flat XY colliders.
    let camera = Camera::default()
        .with_viewport(1280, 720)
        .with_orientation(-FRAC_PI_2, 0.0);
    let element = Element::new(Rect::from_center_size(Vec2::ZERO, Vec2::splat(4.0))).with_transform(
        Transform::new(Vec3::new(0.0, 0.0, -10.0)).with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
    );

    let mut world = CollisionWorld::new();
    world.add_2d(
        Collider2d::new(Vec2::splat(-3.0), Vec2::splat(3.0), -5.0)
            .with_layers(LayerMask::layer(3)),
    );

    let mut blocked = world_pipeline(camera.clone()).with_blocking_geometry(world.clone());
    let surface = blocked
        .add_surface(
            Surface::new(RenderMode::World).with_blocking(BlockingMode::TwoD, LayerMask::ALL),
        )
        .unwrap();
    let mut registry = ElementRegistry::new();
    registry.register(surface, element.clone());
    assert!(blocked.raycast_all(&registry, &PointerQuery::at(CENTER)).is_empty());

    // Same scene, but the surface only blocks on a layer the collider is not in.
    let mut masked = world_pipeline(camera).with_blocking_geometry(world);
    let surface = masked
        .add_surface(
            Surface::new(RenderMode::World).with_blocking(BlockingMode::TwoD, LayerMask::layer(2)),
        )
        .unwrap();
    let mut registry = ElementRegistry::new();
    registry.register(surface, element);
    assert_eq!(masked.raycast_all(&registry, &PointerQuery::at(CENTER)).len(), 1);
}

#[test]
fn back_face_rejection_toggle() {
    // Element plane at x=10 facing away from a camera looking +X.
    let away = Element::new(Rect::from_center_size(Vec2::ZERO, Vec2::splat(4.0))).with_transform(
        Transform::new(Vec3::new(10.0, 0.0, 0.0)).with_rotation(Quat::from_rotation_y(-FRAC_PI_2)),
    );

    let mut strict = world_pipeline(forward_camera());
    let surface = strict.add_surface(Surface::new(RenderMode::World)).unwrap();
    let mut registry = ElementRegistry::new();
    registry.register(surface, away.clone());
    assert!(strict.raycast_all(&registry, &PointerQuery::at(CENTER)).is_empty());

    let mut permissive = world_pipeline(forward_camera());
    let surface = permissive
        .add_surface(Surface::new(RenderMode::World).with_ignore_reversed(false))
        .unwrap();
    let mut registry = ElementRegistry::new();
    registry.register(surface, away);
    let hits = permissive.raycast_all(&registry, &PointerQuery::at(CENTER));
    assert_eq!(hits.len(), 1);
    assert!((hits[0].distance - 10.0).abs() < 1e-3);
}

#[test]
fn camera_mode_without_camera_reports_zero_distance() {
    let mut pipeline = PointerPipeline::new(DisplayTopology::single(1000, 1000)).unwrap();
    let surface = pipeline.add_surface(Surface::new(RenderMode::Camera)).unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(surface, screen_element(500.0, 500.0, 100.0));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(500.0, 500.0)));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].distance, 0.0);
}

#[test]
fn overlay_sort_order_ranks_across_surfaces() {
    let mut pipeline = overlay_pipeline();
    let back = pipeline
        .add_surface(Surface::new(RenderMode::Overlay).with_sort_order(0))
        .unwrap();
    let front = pipeline
        .add_surface(Surface::new(RenderMode::Overlay).with_sort_order(10))
        .unwrap();

    let mut registry = ElementRegistry::new();
    // Give the back surface the deeper element; surface order must still win.
    let back_element = registry.register(back, screen_element(50.0, 50.0, 100.0).with_depth(9));
    let front_element = registry.register(front, screen_element(50.0, 50.0, 100.0).with_depth(0));

    let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(50.0, 50.0)));
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].element, front_element);
    assert_eq!(hits[1].element, back_element);
}

#[test]
fn appended_buffer_preserves_existing_entries() {
    let mut pipeline = overlay_pipeline();
    let a = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();
    let b = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();

    let mut registry = ElementRegistry::new();
    registry.register(a, screen_element(50.0, 50.0, 100.0));
    registry.register(b, screen_element(50.0, 50.0, 100.0));

    let query = PointerQuery::at(Vec2::new(50.0, 50.0));
    let mut out = Vec::new();
    pipeline.raycast_surface(a, &registry, &query, &mut out);
    let first = out[0].clone();

    pipeline.raycast_surface(b, &registry, &query, &mut out);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], first);
    assert_eq!(out[1].index, 1);
    assert_eq!(out[1].surface, b);
}
