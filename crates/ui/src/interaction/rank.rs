//! Cross-surface ordering of aggregated hits.

use std::cmp::Ordering;

use super::raycaster::HitResult;

/// Total order for aggregated hits: higher-priority surfaces first, then the
/// topmost element, then the nearest, with the insertion index as the final
/// deterministic tie break.
///
/// Camera-driven surfaces report `i32::MIN` priorities, so among them
/// ordering falls through to sorting layer, depth, and distance; overlay
/// surfaces (where every distance is 0) are ranked by their configured
/// orders instead.
pub fn compare_hits(a: &HitResult, b: &HitResult) -> Ordering {
    b.sort_order_priority
        .cmp(&a.sort_order_priority)
        .then_with(|| b.render_order_priority.cmp(&a.render_order_priority))
        .then_with(|| b.sorting_layer.cmp(&a.sorting_layer))
        .then_with(|| b.sorting_order.cmp(&a.sorting_order))
        .then_with(|| b.depth.cmp(&a.depth))
        .then_with(|| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal))
        .then_with(|| a.index.cmp(&b.index))
}
