//! Camera configuration as produced by the scene loader.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

/// Pose, lens and control settings for the interactive camera.
///
/// This is plain data; `prism_renderer::Camera` builds its matrices and
/// ray cache from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    #[serde(alias = "direction")]
    pub forward: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            forward: Vec3::NEG_Z,
            vertical_fov: 45.0,
            near: 0.1,
            far: 100.0,
            movement_speed: 5.0,
            mouse_sensitivity: 0.008,
        }
    }
}

impl CameraConfig {
    /// Create a configuration with the given lens and pose.
    pub fn new(vertical_fov: f32, near: f32, far: f32, position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
            vertical_fov,
            near,
            far,
            ..Default::default()
        }
    }

    /// Derive the vertical field of view from a physical sensor height and
    /// focal length (both in mm).
    pub fn from_sensor(sensor_height: f32, focal_length: f32, near: f32, far: f32, position: Vec3, forward: Vec3) -> Self {
        Self::new(fov_from_sensor(sensor_height, focal_length), near, far, position, forward)
    }
}

/// Vertical FOV in degrees: 2·atan(h / 2f).
pub fn fov_from_sensor(sensor_height: f32, focal_length: f32) -> f32 {
    2.0 * (sensor_height / (2.0 * focal_length)).atan().to_degrees()
}
