use prism_math::Vec3;

use super::{SdfNode, SignedDistance};

/// Boolean combination applied to two child distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Union,
    SmoothUnion,
    Intersection,
    SmoothIntersection,
    Difference,
    SmoothDifference,
}

impl Operation {
    /// The smooth counterpart of a hard operation.
    pub fn smooth(self) -> Self {
        match self {
            Operation::Union | Operation::SmoothUnion => Operation::SmoothUnion,
            Operation::Intersection | Operation::SmoothIntersection => Operation::SmoothIntersection,
            Operation::Difference | Operation::SmoothDifference => Operation::SmoothDifference,
        }
    }
}

/// Combines two SDF subtrees. Each node owns its children outright.
#[derive(Debug, Clone)]
pub struct SdfConstructive {
    operation: Operation,
    left: Box<SdfNode>,
    right: Box<SdfNode>,
    /// Blend sharpness for smooth operations; larger is sharper
    smoothing: f32,
    material: usize,
}

impl SdfConstructive {
    pub fn new(operation: Operation, left: impl Into<SdfNode>, right: impl Into<SdfNode>, material: usize) -> Self {
        Self {
            operation,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            smoothing: 1.0,
            material,
        }
    }

    /// Set the blend factor. Non-positive values are replaced by a tiny positive one.
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.max(f32::EPSILON);
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn material(&self) -> usize {
        self.material
    }
}

/// Soft maximum, log2(2^(k·a) + 2^(k·b)) / k, in a form that cannot overflow.
pub fn smooth_max(a: f32, b: f32, k: f32) -> f32 {
    a.max(b) + (1.0 + (-k * (a - b).abs()).exp2()).log2() / k
}

/// Soft minimum, -log2(2^(-k·a) + 2^(-k·b)) / k.
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    a.min(b) - (1.0 + (-k * (a - b).abs()).exp2()).log2() / k
}

impl SignedDistance for SdfConstructive {
    fn distance(&self, point: Vec3) -> f32 {
        let a = self.left.distance(point);
        let b = self.right.distance(point);
        let k = self.smoothing;

        match self.operation {
            Operation::Union => a.min(b),
            Operation::SmoothUnion => smooth_min(a, b, k),
            Operation::Intersection => a.max(b),
            Operation::SmoothIntersection => smooth_max(a, b, k),
            Operation::Difference => a.max(-b),
            Operation::SmoothDifference => smooth_max(a, -b, k),
        }
    }

    /// Only intersections of convex children are convex. Unions and
    /// differences can re-approach the surface after receding.
    fn is_convex(&self) -> bool {
        matches!(self.operation, Operation::Intersection | Operation::SmoothIntersection)
            && self.left.is_convex()
            && self.right.is_convex()
    }
}
