//! Affine transform wrapper around a child node.

use prism_math::{Mat4, Mat4Ext, Ray, Vec3};

use super::{Geometry, Shape};

/// Scale differences below this count as uniform.
const UNIFORM_SCALE_TOLERANCE: f32 = 1e-4;

/// Places a child node in the world with an affine matrix.
///
/// Rays are moved into the child's local space with the inverse matrix.
/// The direction is not renormalized, so the child's ray parameter is also
/// the world ray parameter. Normals come back through the forward matrix
/// without translation.
#[derive(Debug, Clone)]
pub struct Transform {
    matrix: Mat4,
    inverse: Mat4,
    child: Box<Geometry>,
}

impl Transform {
    /// Wrap `child` with an arbitrary invertible affine matrix.
    pub fn new(matrix: Mat4, child: impl Into<Geometry>) -> Self {
        let child = child.into();

        if child.contains_sdf() && !matrix.has_uniform_scale(UNIFORM_SCALE_TOLERANCE) {
            log::warn!(
                "Transform with non-uniform scale wraps a {} containing SDF geometry; marched distances will be inexact",
                child.kind()
            );
        }

        Self {
            matrix,
            inverse: matrix.inverse(),
            child: Box::new(child),
        }
    }

    /// Translate, then rotate (Euler degrees, X then Y then Z), then scale.
    pub fn from_trs(translation: Vec3, rotation_degrees: Vec3, scale: Vec3, child: impl Into<Geometry>) -> Self {
        Self::new(Mat4::from_translation_rotation_scale(translation, rotation_degrees, scale), child)
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3, child: impl Into<Geometry>) -> Self {
        Self::new(Mat4::from_translation(translation), child)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn child(&self) -> &Geometry {
        &self.child
    }

    #[inline]
    fn to_local(&self, point: Vec3) -> Vec3 {
        self.inverse.transform_point3(point)
    }
}

impl Shape for Transform {
    fn intersect(&self, ray: &Ray) -> f32 {
        let local = Ray::new(self.to_local(ray.origin), self.inverse.transform_vector3(ray.direction));
        self.child.intersect(&local)
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        let local_normal = self.child.normal(self.to_local(point));
        self.matrix.transform_normal3(local_normal)
    }

    fn material_index(&self, point: Vec3) -> usize {
        self.child.material_index(self.to_local(point))
    }

    fn material_indices(&self, out: &mut Vec<usize>) {
        self.child.material_indices(out);
    }
}
