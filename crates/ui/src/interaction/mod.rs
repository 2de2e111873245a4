//! The raycast pipeline stages: viewport mapping, occluder prefiltering,
//! candidate collection, hit assembly, and cross-surface ranking.

pub mod occlusion;
pub mod rank;
pub mod raycaster;
pub mod viewport;

pub use occlusion::BlockingMode;
pub use rank::compare_hits;
pub use raycaster::{HitResult, PointerQuery};
pub use viewport::MappedPointer;
