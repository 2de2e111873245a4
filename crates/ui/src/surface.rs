//! UI surfaces: render targets that own hit-testable elements.

use raypick_camera::Camera;
use raypick_collision::LayerMask;
use serde::{Deserialize, Serialize};

use crate::interaction::occlusion::BlockingMode;

/// How a surface maps onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Pixel-aligned overlay with no camera; element coordinates are screen
    /// pixels.
    Overlay,
    /// Rendered through a camera in screen space.
    Camera,
    /// Placed freely in the 3D world and viewed through a camera.
    World,
}

/// Identifier of a surface registered with the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// One addressable render target holding hit-testable elements.
///
/// Exactly one camera resolution rule applies per render mode; see
/// [`Surface::event_camera`].
#[derive(Debug, Clone)]
pub struct Surface {
    /// How the surface maps onto the screen.
    pub render_mode: RenderMode,
    /// Camera assigned to this surface, if any.
    pub camera: Option<Camera>,
    /// Display the surface itself targets (used in overlay mode and whenever
    /// no camera resolves).
    pub target_display: usize,
    /// Sort order relative to sibling surfaces.
    pub sort_order: i32,
    /// Sorting layer the surface renders in.
    pub sorting_layer: i32,
    /// Render order of the surface within the frame.
    pub render_order: i32,
    /// Which physical-geometry casts run before hits are accepted.
    pub blocking: BlockingMode,
    /// Layers the blocking casts are restricted to.
    pub blocking_mask: LayerMask,
    /// Reject elements facing away from the viewer.
    pub ignore_reversed: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Overlay,
            camera: None,
            target_display: 0,
            sort_order: 0,
            sorting_layer: 0,
            render_order: 0,
            blocking: BlockingMode::None,
            blocking_mask: LayerMask::ALL,
            ignore_reversed: true,
        }
    }
}

impl Surface {
    /// Create a surface in the given render mode.
    pub fn new(render_mode: RenderMode) -> Self {
        Self {
            render_mode,
            ..Default::default()
        }
    }

    /// Builder: assign a camera.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Builder: target a display.
    pub fn with_target_display(mut self, display: usize) -> Self {
        self.target_display = display;
        self
    }

    /// Builder: set the sort order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Builder: set the sorting layer.
    pub fn with_sorting_layer(mut self, sorting_layer: i32) -> Self {
        self.sorting_layer = sorting_layer;
        self
    }

    /// Builder: set the render order.
    pub fn with_render_order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    /// Builder: enable physical-geometry blocking.
    pub fn with_blocking(mut self, mode: BlockingMode, mask: LayerMask) -> Self {
        self.blocking = mode;
        self.blocking_mask = mask;
        self
    }

    /// Builder: toggle back-face rejection.
    pub fn with_ignore_reversed(mut self, ignore_reversed: bool) -> Self {
        self.ignore_reversed = ignore_reversed;
        self
    }

    /// The camera that generates rays for this surface.
    ///
    /// Overlay surfaces never use a camera. Camera- and world-space surfaces
    /// use their own camera, falling back to the scene primary; a
    /// camera-space surface with neither runs camera-less (every hit reports
    /// distance 0).
    pub fn event_camera<'a>(&'a self, primary: Option<&'a Camera>) -> Option<&'a Camera> {
        match self.render_mode {
            RenderMode::Overlay => None,
            RenderMode::Camera | RenderMode::World => self.camera.as_ref().or(primary),
        }
    }

    /// Display whose pointer events this surface listens to.
    ///
    /// Camera-space surfaces follow their resolved camera's target display;
    /// overlay and world surfaces keep their own configured display.
    pub fn event_display(&self, camera: Option<&Camera>) -> usize {
        match (self.render_mode, camera) {
            (RenderMode::Camera, Some(camera)) => camera.target_display,
            _ => self.target_display,
        }
    }

    /// Aggregation priority keyed by sort order.
    ///
    /// Overlay surfaces report their sort order because every overlay hit has
    /// distance 0; camera-driven surfaces defer to distance instead.
    pub fn sort_order_priority(&self) -> i32 {
        match self.render_mode {
            RenderMode::Overlay => self.sort_order,
            _ => i32::MIN,
        }
    }

    /// Aggregation priority keyed by render order; same policy as
    /// [`Self::sort_order_priority`].
    pub fn render_order_priority(&self) -> i32 {
        match self.render_mode {
            RenderMode::Overlay => self.render_order,
            _ => i32::MIN,
        }
    }
}
