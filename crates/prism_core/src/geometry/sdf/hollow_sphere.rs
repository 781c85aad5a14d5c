use prism_math::{Vec2, Vec3};

use super::SignedDistance;

/// A spherical shell of the given thickness with an opening cut at `height`
/// above the center (a bowl when `height` is positive).
#[derive(Debug, Clone, PartialEq)]
pub struct SdfHollowSphere {
    center: Vec3,
    radius: f32,
    thickness: f32,
    height: f32,
    /// Radius of the rim circle at the cut height
    rim: f32,
    material: usize,
}

impl SdfHollowSphere {
    pub fn new(center: Vec3, radius: f32, thickness: f32, height: f32, material: usize) -> Self {
        let height = height.clamp(-radius, radius);
        Self {
            center,
            radius,
            thickness,
            height,
            rim: (radius * radius - height * height).max(0.0).sqrt(),
            material,
        }
    }

    pub fn material(&self) -> usize {
        self.material
    }
}

impl SignedDistance for SdfHollowSphere {
    fn distance(&self, point: Vec3) -> f32 {
        let p = point - self.center;
        let q = Vec2::new(Vec2::new(p.x, p.z).length(), p.y);

        if self.height * q.x < self.rim * q.y {
            // Nearest feature is the rim edge
            (q - Vec2::new(self.rim, self.height)).length() - self.thickness
        } else {
            (q.length() - self.radius).abs() - self.thickness
        }
    }

    fn is_convex(&self) -> bool {
        false
    }
}
