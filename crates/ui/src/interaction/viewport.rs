//! Screen-to-viewport mapping and display disambiguation.

use glam::Vec2;
use raypick_camera::Camera;
use raypick_display::{DisplayTopology, PointerRouter};

/// A pointer position resolved against one surface's display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPointer {
    /// Position in the display's pixel space.
    pub screen: Vec2,
    /// Position as a viewport fraction; inside the viewport both axes are in
    /// `[0, 1]`.
    pub viewport: Vec2,
}

/// Resolve `raw` against the display a surface listens to.
///
/// Returns `None` when the event belongs to a different display or falls
/// outside the viewport; both are silent rejections, not errors.
///
/// A pre-resolved display index (from the query) takes precedence over the
/// router and carries the same mismatch rule. With neither available the
/// event is assumed to have happened on the surface's own display.
pub fn map_pointer(
    raw: Vec2,
    resolved_display: Option<usize>,
    surface_display: usize,
    router: Option<&dyn PointerRouter>,
    topology: &DisplayTopology,
    camera: Option<&Camera>,
) -> Option<MappedPointer> {
    let screen = if let Some(display) = resolved_display {
        if display != surface_display {
            return None;
        }
        raw
    } else if let Some(sample) = router.and_then(|router| router.locate(raw)) {
        if sample.display != surface_display {
            return None;
        }
        sample.position
    } else {
        raw
    };

    let viewport = match camera {
        Some(camera) => camera.screen_to_viewport(screen),
        None => screen / topology.resolution_for(surface_display).size(),
    };

    if viewport.x < 0.0 || viewport.x > 1.0 || viewport.y < 0.0 || viewport.y > 1.0 {
        return None;
    }

    Some(MappedPointer { screen, viewport })
}
