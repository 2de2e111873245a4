//! Pipeline orchestration: validated surfaces, per-surface raycasts, and
//! cross-surface aggregation.

use raypick_camera::Camera;
use raypick_collision::BlockingGeometry;
use raypick_display::{DisplayTopology, PointerRouter};
use thiserror::Error;
use tracing::debug;

use crate::interaction::raycaster::{self, HitResult, PointerQuery};
use crate::interaction::{occlusion, rank, viewport};
use crate::registry::ElementRegistry;
use crate::surface::{RenderMode, Surface, SurfaceId};

/// Surface or pipeline configuration rejected at registration time.
///
/// These are the only faults the pipeline ever reports; every steady-state
/// disqualification is a silent empty result instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// World-space surfaces need some camera to ever resolve a ray.
    #[error("world-space surface has no camera and the pipeline has no primary camera")]
    WorldSurfaceWithoutCamera,
    /// The surface (or its camera) targets a display the topology lacks.
    #[error("surface targets display {display} but only {available} display(s) exist")]
    UnknownTargetDisplay {
        /// The display index the surface resolved to.
        display: usize,
        /// Number of displays in the topology.
        available: usize,
    },
    /// A pipeline needs at least one display to map pointers against.
    #[error("display topology is empty")]
    EmptyTopology,
}

/// Owns the registered surfaces and the per-query scratch state.
///
/// Queries are synchronous and run to completion per call; the scratch
/// buffer is pooled across queries and cleared between surfaces, which is
/// why query methods take `&mut self` (one query at a time per pipeline).
pub struct PointerPipeline {
    topology: DisplayTopology,
    router: Option<Box<dyn PointerRouter>>,
    blocking: Option<Box<dyn BlockingGeometry>>,
    primary_camera: Option<Camera>,
    surfaces: Vec<Surface>,
    scratch: Vec<usize>,
}

impl PointerPipeline {
    /// Build a pipeline over `topology`.
    pub fn new(topology: DisplayTopology) -> Result<Self, ConfigError> {
        if topology.is_empty() {
            return Err(ConfigError::EmptyTopology);
        }
        Ok(Self {
            topology,
            router: None,
            blocking: None,
            primary_camera: None,
            surfaces: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Builder: install multi-display pointer routing.
    pub fn with_router(mut self, router: impl PointerRouter + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    /// Builder: install physical geometry for blocking checks.
    pub fn with_blocking_geometry(mut self, geometry: impl BlockingGeometry + 'static) -> Self {
        self.blocking = Some(Box::new(geometry));
        self
    }

    /// Builder: fallback camera for surfaces without their own.
    pub fn with_primary_camera(mut self, camera: Camera) -> Self {
        self.primary_camera = Some(camera);
        self
    }

    /// Register a surface, validating its configuration once.
    pub fn add_surface(&mut self, surface: Surface) -> Result<SurfaceId, ConfigError> {
        if surface.render_mode == RenderMode::World
            && surface.camera.is_none()
            && self.primary_camera.is_none()
        {
            return Err(ConfigError::WorldSurfaceWithoutCamera);
        }

        let display = surface.event_display(surface.event_camera(self.primary_camera.as_ref()));
        if display >= self.topology.len() {
            return Err(ConfigError::UnknownTargetDisplay {
                display,
                available: self.topology.len(),
            });
        }

        let id = SurfaceId(self.surfaces.len() as u32);
        debug!(surface = id.0, mode = ?surface.render_mode, display, "registered surface");
        self.surfaces.push(surface);
        Ok(id)
    }

    /// Registered surface lookup.
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)
    }

    /// Number of registered surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Raycast one surface, appending hits for it to `out`.
    ///
    /// Hits already in `out` (from other surfaces or raycasters) are never
    /// touched or reordered; new hits record the aggregate insertion index
    /// they were appended at.
    pub fn raycast_surface(
        &mut self,
        id: SurfaceId,
        registry: &ElementRegistry,
        query: &PointerQuery,
        out: &mut Vec<HitResult>,
    ) {
        let Some(surface) = self.surfaces.get(id.0 as usize) else {
            return;
        };
        let elements = registry.elements(id);
        if elements.is_empty() {
            return;
        }

        let camera = surface.event_camera(self.primary_camera.as_ref());
        let display = surface.event_display(camera);

        let Some(mapped) = viewport::map_pointer(
            query.position,
            query.display,
            display,
            self.router.as_deref(),
            &self.topology,
            camera,
        ) else {
            return;
        };

        let ray = camera.map(|camera| camera.screen_point_to_ray(mapped.screen));

        // Physical occlusion only applies when a camera projects the surface
        // into the world.
        let blocking_distance = match (camera, &ray) {
            (Some(camera), Some(ray)) => occlusion::blocking_distance(
                surface.blocking,
                surface.blocking_mask,
                ray,
                camera,
                self.blocking.as_deref(),
            ),
            _ => f32::INFINITY,
        };

        raycaster::collect_candidates(elements, mapped.screen, camera, &mut self.scratch);
        raycaster::assemble_hits(
            id,
            surface,
            elements,
            &self.scratch,
            camera,
            ray,
            mapped.screen,
            blocking_distance,
            out,
        );
        self.scratch.clear();
    }

    /// Raycast every surface the query allows and return the ranked
    /// aggregate list.
    pub fn raycast_all(&mut self, registry: &ElementRegistry, query: &PointerQuery) -> Vec<HitResult> {
        let mut hits = Vec::new();
        for index in 0..self.surfaces.len() {
            let id = SurfaceId(index as u32);
            if let Some(filter) = &query.surfaces {
                if !filter.contains(&id) {
                    continue;
                }
            }
            self.raycast_surface(id, registry, query, &mut hits);
        }
        hits.sort_by(rank::compare_hits);
        hits
    }
}
