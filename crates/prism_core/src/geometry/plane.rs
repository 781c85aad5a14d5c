//! Infinite analytic plane, optionally checkered.

use prism_math::{Ray, Vec3};

use super::{Checker, Shape, NO_HIT};

/// Denominators below this are treated as a ray parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    position: Vec3,
    normal: Vec3,
    material: usize,
    checker: Option<Checker>,
}

impl Plane {
    /// Create a single-material plane. The normal is normalized.
    pub fn new(position: Vec3, normal: Vec3, material: usize) -> Self {
        Self {
            position,
            normal: normal.normalize_or_zero(),
            material,
            checker: None,
        }
    }

    /// Create a plane that alternates between `material` and `alternate`.
    pub fn checkered(position: Vec3, normal: Vec3, material: usize, alternate: usize) -> Self {
        let mut plane = Self::new(position, normal, material);
        plane.checker = Some(Checker::new(position, plane.normal, alternate));
        plane
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> f32 {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() <= PARALLEL_EPSILON {
            return NO_HIT;
        }

        let t = (self.position - ray.origin).dot(self.normal) / denom;
        if t >= 0.0 {
            t
        } else {
            NO_HIT
        }
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn material_index(&self, point: Vec3) -> usize {
        match &self.checker {
            Some(checker) => checker.material_at(point, self.material),
            None => self.material,
        }
    }

    fn material_indices(&self, out: &mut Vec<usize>) {
        out.push(self.material);
        if let Some(checker) = &self.checker {
            out.push(checker.alternate());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);

        assert!((plane.intersect(&ray) - 1.0).abs() < 1e-6);
        assert_eq!(plane.normal(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 0);
        let ray = Ray::new(Vec3::Y, Vec3::X);
        assert_eq!(plane.intersect(&ray), NO_HIT);
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 0);
        let ray = Ray::new(Vec3::Y, Vec3::Y);
        assert_eq!(plane.intersect(&ray), NO_HIT);
    }

    #[test]
    fn test_normal_is_normalized() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), 0);
        assert_eq!(plane.normal(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_checkered_plane_materials() {
        let plane = Plane::checkered(Vec3::ZERO, Vec3::Y, 2, 3);
        let mut indices = Vec::new();
        plane.material_indices(&mut indices);
        assert_eq!(indices, vec![2, 3]);

        let a = plane.material_index(Vec3::new(0.5, 0.0, 0.5));
        let b = plane.material_index(Vec3::new(1.5, 0.0, 0.5));
        assert_ne!(a, b);
    }
}
