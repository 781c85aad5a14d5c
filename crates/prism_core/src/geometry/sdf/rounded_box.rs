use prism_math::Vec3;

use super::SignedDistance;

/// An axis-aligned box with optionally rounded edges.
///
/// `rounding` pulls the flat faces inward and replaces edges and corners
/// with arcs of that radius, keeping the outer extent at `min`/`max`.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfBox {
    center: Vec3,
    half_extents: Vec3,
    rounding: f32,
    material: usize,
}

impl SdfBox {
    pub fn new(min: Vec3, max: Vec3, rounding: f32, material: usize) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        let half_extents = (hi - lo) / 2.0;
        Self {
            center: (lo + hi) / 2.0,
            half_extents,
            rounding: rounding.clamp(0.0, half_extents.min_element()),
            material,
        }
    }

    pub fn material(&self) -> usize {
        self.material
    }
}

impl SignedDistance for SdfBox {
    fn distance(&self, point: Vec3) -> f32 {
        let q = (point - self.center).abs() - self.half_extents + Vec3::splat(self.rounding);
        q.max(Vec3::ZERO).length() + q.max_element().min(0.0) - self.rounding
    }

    fn is_convex(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_face_distance() {
        let b = SdfBox::new(Vec3::splat(-1.0), Vec3::splat(1.0), 0.0, 0);

        assert!((b.distance(Vec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!((b.distance(Vec3::ZERO) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rounding_keeps_faces_and_shaves_corners() {
        let sharp = SdfBox::new(Vec3::splat(-1.0), Vec3::splat(1.0), 0.0, 0);
        let round = SdfBox::new(Vec3::splat(-1.0), Vec3::splat(1.0), 0.25, 0);

        let face = Vec3::new(2.0, 0.0, 0.0);
        assert!((sharp.distance(face) - round.distance(face)).abs() < 1e-6);

        let corner = Vec3::splat(2.0);
        assert!(round.distance(corner) > sharp.distance(corner));
    }
}
