//! Candidate collection and hit assembly — the algorithmic core of the
//! pipeline.

use glam::{Vec2, Vec3};
use raypick_camera::{Camera, Ray};

use crate::element::Element;
use crate::registry::ElementHandle;
use crate::surface::{Surface, SurfaceId};

/// One pointer query, constructed per input tick and consumed synchronously.
#[derive(Debug, Clone, Default)]
pub struct PointerQuery {
    /// Raw pointer position in screen pixels.
    pub position: Vec2,
    /// Display the host already attributed the event to, when known. Surfaces
    /// listening to a different display silently produce no hits.
    pub display: Option<usize>,
    /// Restrict the query to these surfaces (`None` considers all).
    pub surfaces: Option<Vec<SurfaceId>>,
}

impl PointerQuery {
    /// Query at `position` with no display attribution or surface filter.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: attribute the event to `display`.
    pub fn on_display(mut self, display: usize) -> Self {
        self.display = Some(display);
        self
    }

    /// Builder: only consider `surfaces`.
    pub fn with_surfaces(mut self, surfaces: Vec<SurfaceId>) -> Self {
        self.surfaces = Some(surfaces);
        self
    }
}

/// One accepted hit, ready for event dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// The element that was hit.
    pub element: ElementHandle,
    /// Surface the element is registered on.
    pub surface: SurfaceId,
    /// Distance from the viewer along the ray; `0` without a camera.
    pub distance: f32,
    /// Pointer position in the display's pixel space.
    pub screen_position: Vec2,
    /// Zero-based position in the aggregate result buffer at append time;
    /// the stable tie break when everything else compares equal.
    pub index: usize,
    /// The element's draw depth within its surface.
    pub depth: i32,
    /// The surface's sorting layer.
    pub sorting_layer: i32,
    /// The surface's sort order.
    pub sorting_order: i32,
    /// Aggregation priority keyed by surface sort order.
    pub sort_order_priority: i32,
    /// Aggregation priority keyed by surface render order.
    pub render_order_priority: i32,
}

/// Collect the elements under `pointer`, topmost first.
///
/// `scratch` receives indices into `elements`; the per-element test
/// short-circuits cheapest-first: draw/enable/cull state, rectangle
/// containment under the projection, far-clip, then the custom hit shape.
/// The final sort is stable so registration order breaks depth ties.
pub(crate) fn collect_candidates(
    elements: &[(ElementHandle, Element)],
    pointer: Vec2,
    camera: Option<&Camera>,
    scratch: &mut Vec<usize>,
) {
    scratch.clear();

    for (index, (_, element)) in elements.iter().enumerate() {
        // depth -1 means the surface never drew the element.
        if element.depth == -1 || !element.raycast_target || element.culled {
            continue;
        }
        let Some(local) = element.local_hit_point(pointer, camera) else {
            continue;
        };
        if !element.rect.contains(local) {
            continue;
        }
        if let Some(camera) = camera {
            if camera.view_depth(element.transform.position) > camera.far {
                continue;
            }
        }
        if !element.hit_shape.accepts(local) {
            continue;
        }
        scratch.push(index);
    }

    scratch.sort_by(|&a, &b| elements[b].1.depth.cmp(&elements[a].1.depth));
}

/// Run back-face, distance, and occlusion checks over the depth-sorted
/// candidates, appending survivors to `out` in order.
///
/// Entries already in `out` are never touched; a candidate failing any check
/// is dropped entirely rather than emitted with partial data.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assemble_hits(
    surface_id: SurfaceId,
    surface: &Surface,
    elements: &[(ElementHandle, Element)],
    candidates: &[usize],
    camera: Option<&Camera>,
    ray: Option<Ray>,
    screen_position: Vec2,
    blocking_distance: f32,
    out: &mut Vec<HitResult>,
) {
    for &index in candidates {
        let (handle, element) = &elements[index];

        if surface.ignore_reversed {
            let viewer_forward = match camera {
                Some(camera) => camera.forward(),
                // Without a camera everything is viewed head-on from -Z.
                None => Vec3::Z,
            };
            if viewer_forward.dot(element.forward()) <= 0.0 {
                continue;
            }
        }

        let distance = match ray {
            Some(ray) => {
                let normal = element.forward();
                // Ray-plane intersection against the element's facing plane.
                let distance =
                    normal.dot(element.transform.position - ray.origin) / normal.dot(ray.direction);
                if distance < 0.0 {
                    // Behind the viewer.
                    continue;
                }
                distance
            }
            None => 0.0,
        };

        if distance >= blocking_distance {
            continue;
        }

        out.push(HitResult {
            element: *handle,
            surface: surface_id,
            distance,
            screen_position,
            index: out.len(),
            depth: element.depth,
            sorting_layer: surface.sorting_layer,
            sorting_order: surface.sort_order,
            sort_order_priority: surface.sort_order_priority(),
            render_order_priority: surface.render_order_priority(),
        });
    }
}
