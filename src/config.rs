use anyhow::{bail, Context, Result};
use glam::{Quat, Vec2, Vec3};
use raypick_camera::Camera;
use raypick_collision::{Aabb, Collider2d, Collider3d, CollisionWorld, LayerMask};
use raypick_display::{Display, DisplayTopology, SpanRouter};
use raypick_ui::{
    BlockingMode, Element, ElementRegistry, HitShape, PointerPipeline, Rect, RenderMode, Surface,
    Transform,
};
use serde::Deserialize;
use std::{fs, path::Path};

/// A complete scene description loaded from TOML: displays, cameras,
/// surfaces with their elements, and blocking colliders.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub displays: Vec<DisplayConfig>,
    /// Route pointers across displays tiled left-to-right. Off by default;
    /// hosts usually attribute events themselves.
    pub span_router: bool,
    pub primary_camera: Option<CameraConfig>,
    pub surfaces: Vec<SurfaceConfig>,
    pub colliders: ColliderSetConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            displays: vec![DisplayConfig {
                width: 1920,
                height: 1080,
            }],
            span_router: false,
            primary_camera: None,
            surfaces: Vec::new(),
            colliders: ColliderSetConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Yaw in degrees around the Y axis.
    pub yaw_degrees: f32,
    /// Pitch in degrees around the local X axis.
    pub pitch_degrees: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub target_display: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            target_display: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub mode: RenderMode,
    pub camera: Option<CameraConfig>,
    pub target_display: usize,
    pub sort_order: i32,
    pub sorting_layer: i32,
    pub render_order: i32,
    pub blocking: BlockingMode,
    /// Bit mask of collision layers the blocking casts consider.
    pub blocking_mask: u32,
    pub ignore_reversed: bool,
    pub elements: Vec<ElementConfig>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Overlay,
            camera: None,
            target_display: 0,
            sort_order: 0,
            sorting_layer: 0,
            render_order: 0,
            blocking: BlockingMode::None,
            blocking_mask: u32::MAX,
            ignore_reversed: true,
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Optional name echoed back in hit output.
    pub name: String,
    /// Rectangle size in local units, centered on the transform.
    pub size: [f32; 2],
    pub position: [f32; 3],
    /// Euler rotation in degrees, applied yaw (Y), pitch (X), roll (Z).
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],
    pub depth: i32,
    pub raycast_target: bool,
    pub culled: bool,
    /// Restrict hits to an inscribed ellipse instead of the full rectangle.
    pub elliptical: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: [100.0, 100.0],
            position: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
            depth: 0,
            raycast_target: true,
            culled: false,
            elliptical: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColliderSetConfig {
    pub boxes: Vec<BoxColliderConfig>,
    pub planes: Vec<PlaneColliderConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoxColliderConfig {
    pub center: [f32; 3],
    pub size: [f32; 3],
    #[serde(default = "all_layers")]
    pub layers: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlaneColliderConfig {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub z: f32,
    #[serde(default = "all_layers")]
    pub layers: u32,
}

fn all_layers() -> u32 {
    u32::MAX
}

/// A scene ready to answer pointer queries, plus the element names for
/// human-readable output.
pub struct Scene {
    pub pipeline: PointerPipeline,
    pub registry: ElementRegistry,
    pub names: Vec<(raypick_ui::ElementHandle, String)>,
}

impl SceneConfig {
    /// Load a scene description, failing loudly; a driver run without its
    /// scene is meaningless.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse scene from {}", path.display()))
    }

    /// Build the runtime scene this config describes.
    pub fn build(&self) -> Result<Scene> {
        if self.displays.is_empty() {
            bail!("scene declares no displays");
        }
        let topology = DisplayTopology::new(
            self.displays
                .iter()
                .map(|d| Display::new(d.width, d.height))
                .collect(),
        );

        let mut pipeline = PointerPipeline::new(topology.clone())?;
        if self.span_router {
            pipeline = pipeline.with_router(SpanRouter::new(topology.clone()));
        }
        if let Some(camera) = &self.primary_camera {
            pipeline = pipeline.with_primary_camera(camera.build(&topology));
        }
        if !self.colliders.boxes.is_empty() || !self.colliders.planes.is_empty() {
            pipeline = pipeline.with_blocking_geometry(self.colliders.build());
        }

        let mut registry = ElementRegistry::new();
        let mut names = Vec::new();
        for surface_config in &self.surfaces {
            let surface = surface_config.build(&topology);
            let id = pipeline
                .add_surface(surface)
                .context("invalid surface configuration")?;
            for element_config in &surface_config.elements {
                let handle = registry.register(id, element_config.build());
                names.push((handle, element_config.name.clone()));
            }
        }

        Ok(Scene {
            pipeline,
            registry,
            names,
        })
    }
}

impl CameraConfig {
    fn build(&self, topology: &DisplayTopology) -> Camera {
        let display = topology.resolution_for(self.target_display);
        let mut camera = Camera::new(Vec3::from(self.position))
            .with_orientation(
                self.yaw_degrees.to_radians(),
                self.pitch_degrees.to_radians(),
            )
            .with_clip_planes(self.near, self.far)
            .with_target_display(self.target_display)
            .with_viewport(display.width, display.height);
        camera.fov = self.fov_degrees.to_radians();
        camera
    }
}

impl SurfaceConfig {
    fn build(&self, topology: &DisplayTopology) -> Surface {
        let mut surface = Surface::new(self.mode)
            .with_target_display(self.target_display)
            .with_sort_order(self.sort_order)
            .with_sorting_layer(self.sorting_layer)
            .with_render_order(self.render_order)
            .with_blocking(self.blocking, LayerMask::from(self.blocking_mask))
            .with_ignore_reversed(self.ignore_reversed);
        if let Some(camera) = &self.camera {
            surface = surface.with_camera(camera.build(topology));
        }
        surface
    }
}

impl ElementConfig {
    fn build(&self) -> Element {
        let rect = Rect::from_center_size(Vec2::ZERO, Vec2::from(self.size));
        let rotation = Quat::from_euler(
            glam::EulerRot::YXZ,
            self.rotation_degrees[1].to_radians(),
            self.rotation_degrees[0].to_radians(),
            self.rotation_degrees[2].to_radians(),
        );
        let transform = Transform::new(Vec3::from(self.position))
            .with_rotation(rotation)
            .with_scale(Vec3::from(self.scale));

        let mut element = Element::new(rect)
            .with_transform(transform)
            .with_depth(self.depth)
            .with_raycast_target(self.raycast_target)
            .with_culled(self.culled);
        if self.elliptical {
            let half = Vec2::from(self.size) * 0.5;
            element = element.with_hit_shape(HitShape::Custom(std::sync::Arc::new(
                move |p: Vec2| {
                    let n = p / half;
                    n.length_squared() <= 1.0
                },
            )));
        }
        element
    }
}

impl ColliderSetConfig {
    fn build(&self) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        for collider in &self.boxes {
            world.add_3d(
                Collider3d::new(Aabb::from_center_size(
                    Vec3::from(collider.center),
                    Vec3::from(collider.size),
                ))
                .with_layers(LayerMask::from(collider.layers)),
            );
        }
        for collider in &self.planes {
            world.add_2d(
                Collider2d::new(
                    Vec2::from(collider.min),
                    Vec2::from(collider.max),
                    collider.z,
                )
                .with_layers(LayerMask::from(collider.layers)),
            );
        }
        world
    }
}
