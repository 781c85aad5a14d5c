//! Two-material checkerboard tiling for planes.

use prism_math::Vec3;

/// Tiles a plane into unit squares alternating between two materials.
///
/// The in-plane axes are computed once from the normal. Axis-aligned normals
/// get fixed axes so tiles line up with the world grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Checker {
    origin: Vec3,
    width_axis: Vec3,
    height_axis: Vec3,
    alternate: usize,
}

impl Checker {
    /// Build the tiling for a plane through `origin` with unit `normal`.
    pub fn new(origin: Vec3, normal: Vec3, alternate: usize) -> Self {
        let (width_axis, height_axis) = plane_axes(normal);
        Self {
            origin,
            width_axis,
            height_axis,
            alternate,
        }
    }

    pub fn alternate(&self) -> usize {
        self.alternate
    }

    /// Pick between `primary` and the alternate material for a point on the plane.
    ///
    /// Odd tiles use the primary material, even tiles the alternate.
    pub fn material_at(&self, point: Vec3, primary: usize) -> usize {
        let offset = point - self.origin;
        let u = offset.dot(self.width_axis).floor() as i64;
        let v = offset.dot(self.height_axis).floor() as i64;

        if (u + v).rem_euclid(2) == 1 {
            primary
        } else {
            self.alternate
        }
    }
}

/// Two unit axes spanning the plane with the given normal.
fn plane_axes(normal: Vec3) -> (Vec3, Vec3) {
    let width = if normal == Vec3::Y || normal == Vec3::NEG_Y || normal == Vec3::Z {
        Vec3::X
    } else if normal == Vec3::NEG_Z {
        Vec3::NEG_X
    } else if normal == Vec3::X {
        Vec3::NEG_Z
    } else if normal == Vec3::NEG_X {
        Vec3::Z
    } else {
        let cross = normal.cross(Vec3::Z);
        if cross.length_squared() > 1e-12 {
            cross.normalize()
        } else {
            normal.any_orthonormal_vector()
        }
    };
    let height = width.cross(normal);
    (width, height)
}
