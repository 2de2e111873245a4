#![warn(missing_docs)]
//! Camera state and projection math for pointer raycasting.

use glam::{Mat4, UVec2, Vec2, Vec3};

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point `t` units along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera with position, orientation, and projection.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Horizontal rotation in radians (around Y axis).
    pub yaw: f32,
    /// Vertical rotation in radians (around local X axis).
    pub pitch: f32,

    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,

    /// Pixel size of the viewport this camera renders into.
    pub viewport: UVec2,
    /// Index of the display the camera presents to.
    pub target_display: usize,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            viewport: UVec2::new(1280, 720),
            target_display: 0,
        }
    }
}

impl Camera {
    /// Create a new camera with the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: point the camera using yaw/pitch in radians.
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Builder: present to the given display.
    pub fn with_target_display(mut self, display: usize) -> Self {
        self.target_display = display;
        self
    }

    /// Builder: set clip plane distances.
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Get the forward direction vector (where the camera is looking).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the viewport pixel size (and with it the aspect ratio).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = UVec2::new(width, height);
        self.aspect = width as f32 / height as f32;
    }

    /// Builder variant of [`Self::set_viewport`].
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.set_viewport(width, height);
        self
    }

    /// Map a pixel position in this camera's viewport to a viewport fraction.
    ///
    /// Positions inside the viewport land in `[0, 1]` on both axes.
    pub fn screen_to_viewport(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos / self.viewport.as_vec2()
    }

    /// Depth of a world-space point along the camera's view direction.
    ///
    /// Points in front of the camera have positive depth; the far clip test
    /// compares this against [`Self::far`].
    pub fn view_depth(&self, world_pos: Vec3) -> f32 {
        (world_pos - self.position).dot(self.forward())
    }

    /// Cast a ray from the camera through a pixel position.
    ///
    /// Screen origin is the top-left corner of the viewport, matching window
    /// pointer coordinates.
    pub fn screen_point_to_ray(&self, screen_pos: Vec2) -> Ray {
        let size = self.viewport.as_vec2();

        // Normalized device coordinates (-1 to 1), Y up.
        let x = 2.0 * screen_pos.x / size.x - 1.0;
        let y = 1.0 - 2.0 * screen_pos.y / size.y;

        let ray_clip = Vec3::new(x, y, -1.0);

        let inv_proj = self.projection_matrix().inverse();
        let ray_eye = inv_proj.project_point3(ray_clip);
        let ray_eye = Vec3::new(ray_eye.x, ray_eye.y, -1.0);

        let inv_view = self.view_matrix().inverse();
        let direction = inv_view.transform_vector3(ray_eye).normalize();

        Ray {
            origin: self.position,
            direction,
        }
    }
}
