// Transform utilities for Mat4
//
// Extends glam::Mat4 with the helpers the Transform geometry node needs.
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Compose translate * rotX * rotY * rotZ * scale, with Euler angles in degrees.
    fn from_translation_rotation_scale(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4;

    /// Transform a normal as a direction (w=0, no translation) and renormalize it.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;

    /// True when all three basis vectors have the same length (within tolerance).
    ///
    /// Rigid transforms with uniform scale keep signed distances proportional,
    /// which sphere marching relies on.
    fn has_uniform_scale(&self, tolerance: f32) -> bool;
}

impl Mat4Ext for Mat4 {
    fn from_translation_rotation_scale(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
        Mat4::from_translation(translation)
            * Mat4::from_rotation_x(rotation_degrees.x.to_radians())
            * Mat4::from_rotation_y(rotation_degrees.y.to_radians())
            * Mat4::from_rotation_z(rotation_degrees.z.to_radians())
            * Mat4::from_scale(scale)
    }

    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        self.transform_vector3(normal).normalize_or_zero()
    }

    fn has_uniform_scale(&self, tolerance: f32) -> bool {
        let sx = self.x_axis.truncate().length();
        let sy = self.y_axis.truncate().length();
        let sz = self.z_axis.truncate().length();
        (sx - sy).abs() <= tolerance && (sy - sz).abs() <= tolerance && (sx - sz).abs() <= tolerance
    }
}
