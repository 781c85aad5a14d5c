use prism_math::Vec3;

use super::SignedDistance;
use crate::geometry::Checker;

/// Half-space bounded by a plane, optionally checkered.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfPlane {
    position: Vec3,
    normal: Vec3,
    material: usize,
    checker: Option<Checker>,
}

impl SdfPlane {
    pub fn new(position: Vec3, normal: Vec3, material: usize) -> Self {
        Self {
            position,
            normal: normal.normalize_or_zero(),
            material,
            checker: None,
        }
    }

    pub fn checkered(position: Vec3, normal: Vec3, material: usize, alternate: usize) -> Self {
        let mut plane = Self::new(position, normal, material);
        plane.checker = Some(Checker::new(position, plane.normal, alternate));
        plane
    }

    pub fn material_at(&self, point: Vec3) -> usize {
        match &self.checker {
            Some(checker) => checker.material_at(point, self.material),
            None => self.material,
        }
    }

    pub fn material_indices(&self, out: &mut Vec<usize>) {
        out.push(self.material);
        if let Some(checker) = &self.checker {
            out.push(checker.alternate());
        }
    }
}

impl SignedDistance for SdfPlane {
    fn distance(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.normal)
    }

    fn is_convex(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::sdf::SdfGeometry;
    use crate::geometry::{Shape, NO_HIT};
    use prism_math::Ray;

    #[test]
    fn test_plane_march_hits_and_parallel_misses() {
        let plane = SdfGeometry::new(SdfPlane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 0));

        let down = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        assert!((plane.intersect(&down) - 3.0).abs() < 1e-3);

        // Constant distance along a parallel ray trips the convex early-out
        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(plane.intersect(&parallel), NO_HIT);
    }

    #[test]
    fn test_checkered_sdf_plane() {
        let plane = SdfPlane::checkered(Vec3::ZERO, Vec3::Y, 0, 1);
        assert_ne!(plane.material_at(Vec3::new(0.5, 0.0, 0.5)), plane.material_at(Vec3::new(1.5, 0.0, 0.5)));
    }
}
