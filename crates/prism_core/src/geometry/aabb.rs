//! Axis-aligned box solved with the slab method.

use prism_math::{Interval, Ray, Vec3};

use super::{Shape, NO_HIT};

#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
    material: usize,
}

impl Aabb {
    /// Create a box from two opposite corners given in any order.
    pub fn new(a: Vec3, b: Vec3, material: usize) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            material,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    fn axis_interval(&self, axis: usize) -> Interval {
        Interval::new(self.min[axis], self.max[axis])
    }
}

impl Shape for Aabb {
    fn intersect(&self, ray: &Ray) -> f32 {
        let mut bracket = Interval::UNIVERSE;

        for axis in 0..3 {
            let bounds = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction == 0.0 {
                // Parallel to this slab: either always inside it or never
                if !bounds.contains(origin) {
                    return NO_HIT;
                }
                continue;
            }

            let slab = Interval::ordered((bounds.min - origin) / direction, (bounds.max - origin) / direction);
            bracket = bracket.intersect(&slab);
        }

        if bracket.is_empty() || bracket.max < 0.0 {
            return NO_HIT;
        }

        if bracket.min > 0.0 {
            bracket.min
        } else {
            // Origin inside the box: report the exit face
            bracket.max
        }
    }

    /// Outward normal of the face nearest to `point`.
    fn normal(&self, point: Vec3) -> Vec3 {
        let mut best = f32::INFINITY;
        let mut normal = Vec3::Y;

        for axis in 0..3 {
            let mut unit = Vec3::ZERO;
            unit[axis] = 1.0;

            let to_min = (point[axis] - self.min[axis]).abs();
            if to_min < best {
                best = to_min;
                normal = -unit;
            }

            let to_max = (point[axis] - self.max[axis]).abs();
            if to_max < best {
                best = to_max;
                normal = unit;
            }
        }

        normal
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

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5), 0)
    }

    #[test]
    fn test_box_hit_front_face() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);

        let t = aabb.intersect(&ray);
        assert!((t - 2.5).abs() < 1e-6);
        assert_eq!(aabb.normal(ray.at(t)), Vec3::Z);
    }

    #[test]
    fn test_box_normals_per_face() {
        let aabb = unit_box();

        let from_left = Ray::new(Vec3::new(-3.0, 0.1, 0.2), Vec3::X);
        assert_eq!(aabb.normal(from_left.at(aabb.intersect(&from_left))), Vec3::NEG_X);

        let from_above = Ray::new(Vec3::new(0.1, 4.0, -0.2), Vec3::NEG_Y);
        assert_eq!(aabb.normal(from_above.at(aabb.intersect(&from_above))), Vec3::Y);
    }

    #[test]
    fn test_parallel_ray_outside_slab_never_hits() {
        let aabb = unit_box();

        // Direction.x == 0 with origin.x outside [min.x, max.x], for a spread of y/z
        for origin_x in [-1.0, 0.75, 3.0] {
            for (dy, dz) in [(0.0, -1.0), (0.5, -1.0), (-1.0, 0.0), (0.3, 0.3)] {
                let ray = Ray::new(Vec3::new(origin_x, 0.0, 2.0), Vec3::new(0.0, dy, dz));
                assert_eq!(aabb.intersect(&ray), NO_HIT);
            }
        }
    }

    #[test]
    fn test_parallel_ray_inside_slab_hits() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.25, 0.0, 5.0), Vec3::NEG_Z);
        assert!((aabb.intersect(&ray) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_behind_ray_misses() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        assert_eq!(aabb.intersect(&ray), NO_HIT);
    }

    #[test]
    fn test_box_from_inside_hits_exit() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!((aabb.intersect(&ray) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_corners_in_any_order() {
        let aabb = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0), 0);
        assert_eq!(aabb.min(), Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max(), Vec3::new(1.0, 1.0, 2.0));
    }
}
