//! Ray/geometry intersection.
//!
//! Every scene node implements [`Shape`]: an intersection test returning a
//! ray parameter, a world-space normal and a per-point material index. The
//! node set is closed, so [`Geometry`] dispatches with a `match` instead of
//! trait objects.
//!
//! A miss is reported as [`NO_HIT`]. Callers treat any `t <= 0.0` as a miss,
//! which also guards against self-intersection at the ray origin.

mod aabb;
mod checker;
mod plane;
pub mod sdf;
mod sphere;
mod transform;

pub use aabb::Aabb;
pub use checker::Checker;
pub use plane::Plane;
pub use sdf::{SdfGeometry, SdfNode};
pub use sphere::Sphere;
pub use transform::Transform;

use prism_math::{Ray, Vec3};

/// Sentinel distance for "no intersection".
pub const NO_HIT: f32 = -1.0;

/// Capabilities shared by all geometry nodes.
pub trait Shape {
    /// Ray parameter of the nearest intersection ahead of the origin,
    /// or a value `<= 0.0` (normally [`NO_HIT`]) on a miss.
    fn intersect(&self, ray: &Ray) -> f32;

    /// Unit outward normal at a point on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Material table index used at `point`.
    fn material_index(&self, point: Vec3) -> usize;

    /// Append every material index this node can return.
    fn material_indices(&self, out: &mut Vec<usize>);
}

/// A scene geometry node.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    Aabb(Aabb),
    Sdf(SdfGeometry),
    Transform(Transform),
}

impl Geometry {
    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "sphere",
            Geometry::Plane(_) => "plane",
            Geometry::Aabb(_) => "aabb",
            Geometry::Sdf(_) => "sdf",
            Geometry::Transform(_) => "transform",
        }
    }

    /// True if this node or any descendant is sphere-marched.
    pub fn contains_sdf(&self) -> bool {
        match self {
            Geometry::Sdf(_) => true,
            Geometry::Transform(t) => t.child().contains_sdf(),
            _ => false,
        }
    }
}

impl Shape for Geometry {
    fn intersect(&self, ray: &Ray) -> f32 {
        match self {
            Geometry::Sphere(s) => s.intersect(ray),
            Geometry::Plane(p) => p.intersect(ray),
            Geometry::Aabb(b) => b.intersect(ray),
            Geometry::Sdf(s) => s.intersect(ray),
            Geometry::Transform(t) => t.intersect(ray),
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Geometry::Sphere(s) => s.normal(point),
            Geometry::Plane(p) => p.normal(point),
            Geometry::Aabb(b) => b.normal(point),
            Geometry::Sdf(s) => s.normal(point),
            Geometry::Transform(t) => t.normal(point),
        }
    }

    fn material_index(&self, point: Vec3) -> usize {
        match self {
            Geometry::Sphere(s) => s.material_index(point),
            Geometry::Plane(p) => p.material_index(point),
            Geometry::Aabb(b) => b.material_index(point),
            Geometry::Sdf(s) => s.material_index(point),
            Geometry::Transform(t) => t.material_index(point),
        }
    }

    fn material_indices(&self, out: &mut Vec<usize>) {
        match self {
            Geometry::Sphere(s) => s.material_indices(out),
            Geometry::Plane(p) => p.material_indices(out),
            Geometry::Aabb(b) => b.material_indices(out),
            Geometry::Sdf(s) => s.material_indices(out),
            Geometry::Transform(t) => t.material_indices(out),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(s: Sphere) -> Self {
        Geometry::Sphere(s)
    }
}

impl From<Plane> for Geometry {
    fn from(p: Plane) -> Self {
        Geometry::Plane(p)
    }
}

impl From<Aabb> for Geometry {
    fn from(b: Aabb) -> Self {
        Geometry::Aabb(b)
    }
}

impl From<SdfGeometry> for Geometry {
    fn from(s: SdfGeometry) -> Self {
        Geometry::Sdf(s)
    }
}

impl From<SdfNode> for Geometry {
    fn from(node: SdfNode) -> Self {
        Geometry::Sdf(SdfGeometry::new(node))
    }
}

impl From<Transform> for Geometry {
    fn from(t: Transform) -> Self {
        Geometry::Transform(t)
    }
}
