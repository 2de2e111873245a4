//! Element storage shared between the host and the pipeline.

use std::collections::HashMap;

use crate::element::Element;
use crate::surface::SurfaceId;

/// Stable handle to a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

/// Per-surface element collections in registration order.
///
/// The host owns element lifetime through this registry; the pipeline only
/// reads the per-surface slices. Registration order doubles as the draw-order
/// tie break, so it is preserved across removals.
#[derive(Debug)]
pub struct ElementRegistry {
    surfaces: HashMap<SurfaceId, Vec<(ElementHandle, Element)>>,
    next_handle: u64,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Register `element` on `surface`, returning its handle.
    pub fn register(&mut self, surface: SurfaceId, element: Element) -> ElementHandle {
        let handle = ElementHandle(self.next_handle);
        self.next_handle += 1;
        self.surfaces.entry(surface).or_default().push((handle, element));
        handle
    }

    /// Remove an element wherever it is registered.
    pub fn remove(&mut self, handle: ElementHandle) -> Option<Element> {
        for elements in self.surfaces.values_mut() {
            if let Some(index) = elements.iter().position(|(h, _)| *h == handle) {
                return Some(elements.remove(index).1);
            }
        }
        None
    }

    /// Elements registered to `surface`, in registration order.
    pub fn elements(&self, surface: SurfaceId) -> &[(ElementHandle, Element)] {
        self.surfaces.get(&surface).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up an element by handle.
    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.surfaces
            .values()
            .flat_map(|elements| elements.iter())
            .find(|(h, _)| *h == handle)
            .map(|(_, element)| element)
    }

    /// Mutable element lookup, for hosts updating depth or cull state.
    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.surfaces
            .values_mut()
            .flat_map(|elements| elements.iter_mut())
            .find(|(h, _)| *h == handle)
            .map(|(_, element)| element)
    }

    /// Drop every element registered to `surface`.
    pub fn clear_surface(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
    }

    /// Total number of registered elements.
    pub fn len(&self) -> usize {
        self.surfaces.values().map(Vec::len).sum()
    }

    /// Whether no elements are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
