#![warn(missing_docs)]
//! Display topology and pointer-to-display routing.
//!
//! Hosts describe their physical displays once; the raycast pipeline uses the
//! topology to normalize pointer coordinates and to discard events that
//! belong to a different display than the surface being tested.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of one physical display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Display {
    /// Create a display descriptor.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel size as a float vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// The ordered set of displays known to the host. Index 0 is the primary.
#[derive(Debug, Clone)]
pub struct DisplayTopology {
    displays: Vec<Display>,
}

impl DisplayTopology {
    /// Build a topology from an ordered display list.
    pub fn new(displays: Vec<Display>) -> Self {
        Self { displays }
    }

    /// Convenience topology with a single display.
    pub fn single(width: u32, height: u32) -> Self {
        Self::new(vec![Display::new(width, height)])
    }

    /// Number of displays.
    pub fn len(&self) -> usize {
        self.displays.len()
    }

    /// Whether no displays are configured.
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Displays in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Display> {
        self.displays.iter()
    }

    /// The primary display (index 0). Topologies are validated non-empty
    /// before queries run.
    pub fn primary(&self) -> Display {
        debug_assert!(!self.displays.is_empty());
        self.displays[0]
    }

    /// Display at `index`, if configured.
    pub fn get(&self, index: usize) -> Option<Display> {
        self.displays.get(index).copied()
    }

    /// Pixel resolution used to normalize coordinates on `index`.
    ///
    /// The primary display's reported resolution covers index 0 and any index
    /// the topology does not know about; only a configured secondary display
    /// supplies its own dimensions.
    pub fn resolution_for(&self, index: usize) -> Display {
        if index > 0 {
            if let Some(display) = self.get(index) {
                return display;
            }
        }
        self.primary()
    }
}

/// A pointer event attributed to one display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Display the event landed on.
    pub display: usize,
    /// Position in that display's pixel space.
    pub position: Vec2,
}

/// Maps raw pointer positions to the display they landed on.
///
/// `locate` returns `None` on hosts that cannot attribute pointer events to
/// displays; callers then treat the raw position as already local to the
/// display they care about.
pub trait PointerRouter {
    /// Resolve `raw` to a display index and display-local position.
    fn locate(&self, raw: Vec2) -> Option<PointerSample>;
}

/// Router for displays tiled left-to-right in a single virtual desktop.
#[derive(Debug, Clone)]
pub struct SpanRouter {
    topology: DisplayTopology,
}

impl SpanRouter {
    /// Build a router over `topology`.
    pub fn new(topology: DisplayTopology) -> Self {
        Self { topology }
    }
}

impl PointerRouter for SpanRouter {
    fn locate(&self, raw: Vec2) -> Option<PointerSample> {
        if raw.x < 0.0 {
            return None;
        }
        let mut offset = 0.0;
        for (display, descriptor) in self.topology.iter().enumerate() {
            let width = descriptor.width as f32;
            if raw.x < offset + width {
                return Some(PointerSample {
                    display,
                    position: Vec2::new(raw.x - offset, raw.y),
                });
            }
            offset += width;
        }
        None
    }
}
