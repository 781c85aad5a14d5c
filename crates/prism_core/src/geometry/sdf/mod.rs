//! Signed distance field geometry.
//!
//! All SDF shapes share one intersection routine ([`sphere_march`]) and one
//! normal estimator (central differences). Each node only supplies a
//! distance function through [`SignedDistance`].

mod constructive;
mod hollow_sphere;
mod plane;
mod rounded_box;
mod sphere;

pub use constructive::{Operation, SdfConstructive};
pub use hollow_sphere::SdfHollowSphere;
pub use plane::SdfPlane;
pub use rounded_box::SdfBox;
pub use sphere::SdfSphere;

use prism_math::{Ray, Vec3};

use super::{Shape, NO_HIT};

/// March iterations before giving up.
pub const MAX_ITERATIONS: u32 = 500;
/// Distance below which the march counts as a hit.
pub const EPSILON: f32 = 0.001;
/// Ray parameter beyond which the march counts as a miss.
pub const MAX_DEPTH: f32 = 1000.0;
/// Offset used for the central-difference gradient.
pub const NORMAL_OFFSET: f32 = 1e-4;

/// A signed distance function: negative inside, positive outside.
pub trait SignedDistance {
    fn distance(&self, point: Vec3) -> f32;

    /// Convex shapes enable the divergence early-out while marching.
    fn is_convex(&self) -> bool;
}

/// Outcome of a sphere march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct March {
    /// Ray parameter of the hit, or [`NO_HIT`]
    pub t: f32,
    /// Distance evaluations performed
    pub iterations: u32,
}

impl March {
    pub fn is_hit(&self) -> bool {
        self.t > 0.0
    }
}

/// Step along `ray` by the signed distance until the surface is reached.
///
/// Terminates on a hit (distance below [`EPSILON`]), when the depth passes
/// [`MAX_DEPTH`], when a convex field stops shrinking, or after
/// [`MAX_ITERATIONS`] evaluations.
pub fn sphere_march<S: SignedDistance + ?Sized>(sdf: &S, ray: &Ray) -> March {
    let direction_length = ray.direction.length();
    if direction_length == 0.0 {
        return March { t: NO_HIT, iterations: 0 };
    }

    let convex = sdf.is_convex();
    let mut depth = 0.0;
    let mut last_distance = f32::MAX;

    for i in 0..MAX_ITERATIONS {
        let distance = sdf.distance(ray.at(depth));
        let iterations = i + 1;

        if distance < EPSILON {
            return March { t: depth, iterations };
        }

        // Distances are in space units; the returned value is a ray parameter
        depth += distance / direction_length;

        if depth >= MAX_DEPTH || (convex && distance >= last_distance) {
            return March { t: NO_HIT, iterations };
        }

        last_distance = distance;
    }

    March {
        t: NO_HIT,
        iterations: MAX_ITERATIONS,
    }
}

/// Normalized central-difference gradient of the field at `point`.
pub fn estimate_normal<S: SignedDistance + ?Sized>(sdf: &S, point: Vec3) -> Vec3 {
    let dx = Vec3::new(NORMAL_OFFSET, 0.0, 0.0);
    let dy = Vec3::new(0.0, NORMAL_OFFSET, 0.0);
    let dz = Vec3::new(0.0, 0.0, NORMAL_OFFSET);

    Vec3::new(
        sdf.distance(point + dx) - sdf.distance(point - dx),
        sdf.distance(point + dy) - sdf.distance(point - dy),
        sdf.distance(point + dz) - sdf.distance(point - dz),
    )
    .normalize_or_zero()
}

/// A node in an SDF tree.
#[derive(Debug, Clone)]
pub enum SdfNode {
    Sphere(SdfSphere),
    HollowSphere(SdfHollowSphere),
    Box(SdfBox),
    Plane(SdfPlane),
    Constructive(SdfConstructive),
}

impl SdfNode {
    /// Material at `point`. Constructive nodes use their own material,
    /// not their children's.
    pub fn material_index(&self, point: Vec3) -> usize {
        match self {
            SdfNode::Sphere(s) => s.material(),
            SdfNode::HollowSphere(s) => s.material(),
            SdfNode::Box(b) => b.material(),
            SdfNode::Plane(p) => p.material_at(point),
            SdfNode::Constructive(c) => c.material(),
        }
    }

    pub fn material_indices(&self, out: &mut Vec<usize>) {
        match self {
            SdfNode::Sphere(s) => out.push(s.material()),
            SdfNode::HollowSphere(s) => out.push(s.material()),
            SdfNode::Box(b) => out.push(b.material()),
            SdfNode::Plane(p) => p.material_indices(out),
            SdfNode::Constructive(c) => out.push(c.material()),
        }
    }
}

impl SignedDistance for SdfNode {
    fn distance(&self, point: Vec3) -> f32 {
        match self {
            SdfNode::Sphere(s) => s.distance(point),
            SdfNode::HollowSphere(s) => s.distance(point),
            SdfNode::Box(b) => b.distance(point),
            SdfNode::Plane(p) => p.distance(point),
            SdfNode::Constructive(c) => c.distance(point),
        }
    }

    fn is_convex(&self) -> bool {
        match self {
            SdfNode::Sphere(s) => s.is_convex(),
            SdfNode::HollowSphere(s) => s.is_convex(),
            SdfNode::Box(b) => b.is_convex(),
            SdfNode::Plane(p) => p.is_convex(),
            SdfNode::Constructive(c) => c.is_convex(),
        }
    }
}

impl From<SdfSphere> for SdfNode {
    fn from(s: SdfSphere) -> Self {
        SdfNode::Sphere(s)
    }
}

impl From<SdfHollowSphere> for SdfNode {
    fn from(s: SdfHollowSphere) -> Self {
        SdfNode::HollowSphere(s)
    }
}

impl From<SdfBox> for SdfNode {
    fn from(b: SdfBox) -> Self {
        SdfNode::Box(b)
    }
}

impl From<SdfPlane> for SdfNode {
    fn from(p: SdfPlane) -> Self {
        SdfNode::Plane(p)
    }
}

impl From<SdfConstructive> for SdfNode {
    fn from(c: SdfConstructive) -> Self {
        SdfNode::Constructive(c)
    }
}

/// Scene geometry backed by an SDF tree.
#[derive(Debug, Clone)]
pub struct SdfGeometry {
    root: SdfNode,
}

impl SdfGeometry {
    pub fn new(root: impl Into<SdfNode>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &SdfNode {
        &self.root
    }

    /// March with iteration statistics.
    pub fn march(&self, ray: &Ray) -> March {
        sphere_march(&self.root, ray)
    }
}

impl Shape for SdfGeometry {
    fn intersect(&self, ray: &Ray) -> f32 {
        self.march(ray).t
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        estimate_normal(&self.root, point)
    }

    fn material_index(&self, point: Vec3) -> usize {
        self.root.material_index(point)
    }

    fn material_indices(&self, out: &mut Vec<usize>) {
        self.root.material_indices(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A field that grows linearly with depth along -Z but never reaches zero.
    struct Receding {
        convex: bool,
    }

    impl SignedDistance for Receding {
        fn distance(&self, point: Vec3) -> f32 {
            1.0 + (point.z * 1e-3).abs()
        }

        fn is_convex(&self) -> bool {
            self.convex
        }
    }

    /// A field whose distance never shrinks and never grows.
    struct Constant;

    impl SignedDistance for Constant {
        fn distance(&self, _point: Vec3) -> f32 {
            0.5
        }

        fn is_convex(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_sdf_sphere_matches_analytic_distance() {
        let r = 1.5;
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, r, 0));

        for d in [2.0, 5.0, 42.0] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, d), Vec3::NEG_Z);
            let t = sdf.intersect(&ray);
            assert!((t - (d - r)).abs() < EPSILON, "d={} t={}", d, t);
        }
    }

    #[test]
    fn test_sdf_sphere_off_axis_hit() {
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, 1.0, 0));
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::NEG_Z);

        let expected = 5.0 - (1.0f32 - 0.25).sqrt();
        assert!((sdf.intersect(&ray) - expected).abs() < 0.01);
    }

    #[test]
    fn test_convex_divergence_stops_early() {
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, 1.0, 0));
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);

        let march = sdf.march(&away);
        assert!(!march.is_hit());
        assert_eq!(march.iterations, 2);
    }

    #[test]
    fn test_convex_flag_controls_early_out() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let convex = sphere_march(&Receding { convex: true }, &ray);
        assert!(!convex.is_hit());
        assert!(convex.iterations <= 2);

        let general = sphere_march(&Receding { convex: false }, &ray);
        assert!(!general.is_hit());
        assert!(general.iterations > convex.iterations);
        assert!(general.iterations <= MAX_ITERATIONS);
    }

    #[test]
    fn test_march_is_bounded_by_iterations() {
        // Half-unit steps reach neither epsilon nor max depth within the budget
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let march = sphere_march(&Constant, &ray);

        assert_eq!(march.t, NO_HIT);
        assert_eq!(march.iterations, MAX_ITERATIONS);
    }

    #[test]
    fn test_zero_direction_is_miss() {
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, 1.0, 0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        assert_eq!(sdf.intersect(&ray), NO_HIT);
    }

    #[test]
    fn test_unnormalized_direction_returns_ray_parameter() {
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, 1.0, 0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        assert!((sdf.intersect(&ray) - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_gradient_normal_on_sphere() {
        let sdf = SdfGeometry::new(SdfSphere::new(Vec3::ZERO, 1.0, 0));
        let n = sdf.normal(Vec3::new(0.0, 1.0, 0.0));
        assert!((n - Vec3::Y).length() < 1e-3);

        let diagonal = Vec3::new(1.0, 1.0, 1.0).normalize();
        assert!((sdf.normal(diagonal) - diagonal).length() < 1e-3);
    }
}
