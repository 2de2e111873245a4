#![warn(missing_docs)]
//! Pointer hit testing for 2D/3D UI surfaces.
//!
//! Given a pointer position, the registered surfaces, and optional physical
//! collision geometry, the pipeline reports which elements the pointer
//! intersects, topmost first, with the ordering metadata an event dispatcher
//! needs to pick the single receiver. Queries are pure reads: the pipeline
//! never mutates elements, displays, or collision state.
//!
//! # Example
//!
//! ```rust
//! use glam::{Vec2, Vec3};
//! use raypick_display::DisplayTopology;
//! use raypick_ui::{Element, ElementRegistry, PointerPipeline, PointerQuery, Rect, RenderMode, Surface, Transform};
//!
//! let mut pipeline = PointerPipeline::new(DisplayTopology::single(1920, 1080)).unwrap();
//! let surface = pipeline.add_surface(Surface::new(RenderMode::Overlay)).unwrap();
//!
//! let mut registry = ElementRegistry::new();
//! let button = Element::new(Rect::from_center_size(Vec2::ZERO, Vec2::new(200.0, 80.0)))
//!     .with_transform(Transform::new(Vec3::new(960.0, 540.0, 0.0)));
//! let handle = registry.register(surface, button);
//!
//! let hits = pipeline.raycast_all(&registry, &PointerQuery::at(Vec2::new(960.0, 540.0)));
//! assert_eq!(hits[0].element, handle);
//! ```

pub mod element;
pub mod interaction;
pub mod pipeline;
pub mod registry;
pub mod surface;

pub use element::{Element, HitShape, Rect, Transform};
pub use interaction::occlusion::BlockingMode;
pub use interaction::rank::compare_hits;
pub use interaction::raycaster::{HitResult, PointerQuery};
pub use interaction::viewport::MappedPointer;
pub use pipeline::{ConfigError, PointerPipeline};
pub use registry::{ElementHandle, ElementRegistry};
pub use surface::{RenderMode, Surface, SurfaceId};
