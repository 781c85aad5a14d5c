use prism_math::Vec3;

use super::SignedDistance;

#[derive(Debug, Clone, PartialEq)]
pub struct SdfSphere {
    center: Vec3,
    radius: f32,
    material: usize,
}

impl SdfSphere {
    pub fn new(center: Vec3, radius: f32, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn material(&self) -> usize {
        self.material
    }
}

impl SignedDistance for SdfSphere {
    fn distance(&self, point: Vec3) -> f32 {
        (point - self.center).length() - self.radius
    }

    fn is_convex(&self) -> bool {
        true
    }
}
