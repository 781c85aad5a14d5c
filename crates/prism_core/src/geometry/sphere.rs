//! Analytic sphere.

use prism_math::{Ray, Vec3};

use super::{Shape, NO_HIT};

/// A sphere solved with the closed-form quadratic.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: usize,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: usize) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> f32 {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return NO_HIT;
        }
        let half_b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return NO_HIT;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-half_b - sqrtd) / a;
        if near > 0.0 {
            return near;
        }

        // Origin inside the sphere: the far root is the exit point
        let far = (-half_b + sqrtd) / a;
        if far > 0.0 {
            far
        } else {
            NO_HIT
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn material_index(&self, _point: Vec3) -> usize {
        self.material
    }

    fn material_indices(&self, out: &mut Vec<usize>) {
        out.push(self.material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_and_normal() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));

        let t = sphere.intersect(&ray);
        assert!((t - 2.0).abs() < 1e-6);

        let point = ray.at(t);
        assert!((point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
        assert!((sphere.normal(point) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, 0);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.intersect(&ray) <= 0.0);
    }

    #[test]
    fn test_sphere_behind_origin_is_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(sphere.intersect(&ray), NO_HIT);
    }

    #[test]
    fn test_sphere_from_inside_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((sphere.intersect(&ray) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_unnormalized_direction_returns_ray_parameter() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -2.0));
        assert!((sphere.intersect(&ray) - 1.0).abs() < 1e-6);
    }
}
