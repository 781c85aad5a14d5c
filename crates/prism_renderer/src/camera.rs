//! Interactive perspective camera with a cached ray per pixel.

use log::debug;
use prism_core::CameraConfig;
use prism_math::{Mat4, Quat, Vec2, Vec3, Vec4};
use rayon::prelude::*;

/// Radians of rotation per unit of (sensitivity-scaled) mouse movement.
pub const ROTATION_SPEED: f32 = 0.3;

const WORLD_UP: Vec3 = Vec3::Y;

/// Up vector used instead of [`WORLD_UP`] when looking (nearly) straight
/// up or down.
const POLE_UP: Vec3 = Vec3::Z;

/// Squared sine of the angle to the pole below which [`POLE_UP`] applies.
const POLE_EPSILON: f32 = 1e-6;

/// Mouse look stops 1 degree short of straight up or down.
const MAX_PITCH: f32 = 1.553_343;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the camera listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Normal,
    Hidden,
    Locked,
}

/// Mouse and keyboard state, polled once per camera update.
pub trait InputSource {
    fn mouse_position(&self) -> Vec2;
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;
    fn is_key_down(&self, key: Key) -> bool;
    fn set_cursor_mode(&mut self, mode: CursorMode);
}

/// Perspective camera.
///
/// The ray-direction cache holds one world-space unit direction per pixel,
/// row-major with row 0 at the top of the image. Every setter recomputes
/// whatever the change invalidates before returning, so the cache is
/// always current when read.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,

    projection: Mat4,
    inverse_projection: Mat4,
    view: Mat4,
    inverse_view: Mat4,

    viewport_width: u32,
    viewport_height: u32,

    last_mouse_position: Vec2,
    ray_directions: Vec<Vec3>,
}

impl Camera {
    /// Create a camera with an empty viewport. Call [`Camera::on_resize`]
    /// before rendering.
    pub fn new(config: &CameraConfig) -> Self {
        let mut config = *config;
        config.forward = config.forward.try_normalize().unwrap_or(Vec3::NEG_Z);

        let mut camera = Self {
            config,
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            viewport_width: 0,
            viewport_height: 0,
            last_mouse_position: Vec2::ZERO,
            ray_directions: Vec::new(),
        };
        camera.recalculate_view();
        camera
    }

    /// Apply one tick of input. Returns true if the camera moved or turned,
    /// in which case the ray cache has been rebuilt.
    ///
    /// Nothing happens unless the right mouse button is held; the cursor is
    /// locked while it is.
    pub fn on_update(&mut self, delta_time: f32, input: &mut dyn InputSource) -> bool {
        let mouse = input.mouse_position();
        let delta = (mouse - self.last_mouse_position) * self.config.mouse_sensitivity;
        self.last_mouse_position = mouse;

        if !input.is_mouse_button_down(MouseButton::Right) {
            input.set_cursor_mode(CursorMode::Normal);
            return false;
        }
        input.set_cursor_mode(CursorMode::Locked);

        let forward = self.config.forward;
        let right = self.right();
        let step = self.config.movement_speed * delta_time;

        let mut velocity = Vec3::ZERO;
        for (key, axis) in [
            (Key::W, forward),
            (Key::S, -forward),
            (Key::D, right),
            (Key::A, -right),
            (Key::E, WORLD_UP),
            (Key::Q, -WORLD_UP),
        ] {
            if input.is_key_down(key) {
                velocity += axis;
            }
        }

        let mut moved = false;
        if velocity != Vec3::ZERO {
            self.config.position += velocity * step;
            moved = true;
        }

        if delta != Vec2::ZERO {
            let elevation = forward.y.clamp(-1.0, 1.0).asin();
            let pitch = (delta.y * ROTATION_SPEED).clamp(elevation - MAX_PITCH, elevation + MAX_PITCH);
            let yaw = delta.x * ROTATION_SPEED;

            let q = (Quat::from_axis_angle(right, -pitch) * Quat::from_axis_angle(WORLD_UP, -yaw)).normalize();
            self.config.forward = (q * forward).try_normalize().unwrap_or(forward);
            moved = true;
        }

        if moved {
            self.recalculate_view();
            self.recalculate_ray_directions();
        }

        moved
    }

    /// Resize the viewport. Returns false, and does no work, when the size
    /// is unchanged.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.viewport_width && height == self.viewport_height {
            return false;
        }

        debug!("Camera resize {}x{} -> {}x{}", self.viewport_width, self.viewport_height, width, height);
        self.viewport_width = width;
        self.viewport_height = height;

        self.recalculate_projection();
        self.recalculate_ray_directions();
        true
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.config.position = position;
        self.recalculate_view();
        self.recalculate_ray_directions();
    }

    /// Point the camera along `forward`. A zero vector is ignored.
    pub fn set_forward(&mut self, forward: Vec3) {
        if let Some(forward) = forward.try_normalize() {
            self.config.forward = forward;
            self.recalculate_view();
            self.recalculate_ray_directions();
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn set_vertical_fov(&mut self, degrees: f32) {
        self.config.vertical_fov = degrees;
        self.recalculate_projection();
        self.recalculate_ray_directions();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.config.near = near;
        self.config.far = far;
        self.recalculate_projection();
        self.recalculate_ray_directions();
    }

    pub fn position(&self) -> Vec3 {
        self.config.position
    }

    pub fn forward(&self) -> Vec3 {
        self.config.forward
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        let forward = self.config.forward;
        forward.cross(up_for(forward)).normalize_or_zero()
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn inverse_projection(&self) -> Mat4 {
        self.inverse_projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn inverse_view(&self) -> Mat4 {
        self.inverse_view
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// World-space unit ray direction for every pixel, row-major.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    /// Current pose and lens, e.g. for saving back to a scene file.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn recalculate_projection(&mut self) {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return;
        }

        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        self.projection = Mat4::perspective_rh_gl(
            self.config.vertical_fov.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        let position = self.config.position;
        let forward = self.config.forward;
        self.view = Mat4::look_at_rh(position, position + forward, up_for(forward));
        self.inverse_view = self.view.inverse();
    }

    fn recalculate_ray_directions(&mut self) {
        let width = self.viewport_width as usize;
        let height = self.viewport_height as usize;

        self.ray_directions.clear();
        self.ray_directions.resize(width * height, Vec3::ZERO);
        if width == 0 || height == 0 {
            return;
        }

        let inverse_projection = self.inverse_projection;
        let inverse_view = self.inverse_view;

        self.ray_directions
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                // Pixel centres, with +Y at the top of the image
                let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;
                for (x, direction) in row.iter_mut().enumerate() {
                    let ndc_x = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;

                    let target = inverse_projection * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
                    let local = (target.truncate() / target.w).normalize_or_zero();
                    *direction = inverse_view.transform_vector3(local);
                }
            });
    }
}

/// View up vector for a unit `forward`, never parallel to it.
fn up_for(forward: Vec3) -> Vec3 {
    if forward.cross(WORLD_UP).length_squared() < POLE_EPSILON {
        POLE_UP
    } else {
        WORLD_UP
    }
}
