//! Signed Distance Functions (SDF) for 3D shape definition
//!
//! SDFs represent shapes as functions that return the distance from any
//! point in space to the nearest surface. Negative values are inside,
//! positive values are outside, and zero is exactly on the surface.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vostok::prelude::*;
//!
//! // A sphere with radius 1
//! let ball = sphere(1.0);
//!
//! // Combine shapes
//! let dumbbell = sphere(0.5)
//!     .union(sphere(0.5).translate_x(2.0))
//!     .union(cylinder(0.15, 2.0).rotate_z(std::f64::consts::FRAC_PI_2).translate_x(1.0));
//! ```

pub mod operations;
pub mod primitives;
pub mod transforms;

use glam::DVec3;

/// The core SDF trait - any type that can compute distance from a point.
///
/// This is the full contract the mesher relies on: `distance` must be
/// deterministic, and `bounds` must enclose the whole surface. A true
/// (1-Lipschitz) distance function gives the mesher's sphere tracing its
/// no-overshoot guarantee; looser bounds on the field are tolerated at the
/// cost of falling back to bisection on some edges.
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: DVec3) -> f64;

    /// The axis-aligned bounding box enclosing the surface.
    ///
    /// Mesh generation samples exactly this region, so the box must satisfy
    /// `min < max` on every axis and actually contain the zero level set.
    fn bounds(&self) -> Aabb;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered at origin
    pub fn cube(half_size: f64) -> Self {
        Self::new(DVec3::splat(-half_size), DVec3::splat(half_size))
    }

    /// Create from center and half-extents
    pub fn from_center(center: DVec3, half_extents: DVec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Expand the bounding box by a margin
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min - DVec3::splat(margin),
            self.max + DVec3::splat(margin),
        )
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether a point lies inside the closed box
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// An SDF node that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: std::sync::Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: std::sync::Arc::new(sdf),
        }
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds()
    }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized + 'static {
    // === Boolean Operations ===

    /// Union: combine two shapes (OR)
    fn union<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Union::new(self, other))
    }

    /// Subtraction: cut shape `other` from `self`
    fn subtract<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Subtract::new(self, other))
    }

    /// Intersection: keep only where both shapes overlap (AND)
    fn intersect<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Intersect::new(self, other))
    }

    /// Smooth union with blend radius `k`
    fn smooth_union<S: Sdf + 'static>(self, other: S, k: f64) -> SdfNode {
        SdfNode::new(operations::SmoothUnion::new(self, other, k))
    }

    // === Transforms ===

    /// Translate (move) the shape
    fn translate(self, offset: DVec3) -> SdfNode {
        SdfNode::new(transforms::Translate::new(self, offset))
    }

    /// Translate along X axis
    fn translate_x(self, x: f64) -> SdfNode {
        self.translate(DVec3::new(x, 0.0, 0.0))
    }

    /// Translate along Y axis
    fn translate_y(self, y: f64) -> SdfNode {
        self.translate(DVec3::new(0.0, y, 0.0))
    }

    /// Translate along Z axis
    fn translate_z(self, z: f64) -> SdfNode {
        self.translate(DVec3::new(0.0, 0.0, z))
    }

    /// Rotate around X axis (angle in radians)
    fn rotate_x(self, angle: f64) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(
            self,
            glam::DQuat::from_rotation_x(angle),
        ))
    }

    /// Rotate around Y axis (angle in radians)
    fn rotate_y(self, angle: f64) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(
            self,
            glam::DQuat::from_rotation_y(angle),
        ))
    }

    /// Rotate around Z axis (angle in radians)
    fn rotate_z(self, angle: f64) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(
            self,
            glam::DQuat::from_rotation_z(angle),
        ))
    }

    /// Rotate around arbitrary axis (angle in radians)
    fn rotate(self, axis: DVec3, angle: f64) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(
            self,
            glam::DQuat::from_axis_angle(axis.normalize(), angle),
        ))
    }

    /// Uniform scale
    fn scale(self, factor: f64) -> SdfNode {
        SdfNode::new(transforms::Scale::new(self, factor))
    }

    /// Mirror across a plane through the origin defined by its normal
    fn mirror(self, axis: DVec3) -> SdfNode {
        SdfNode::new(transforms::Mirror::new(self, axis.normalize()))
    }

    // === Modifiers ===

    /// Create a hollow shell with given wall thickness
    fn shell(self, thickness: f64) -> SdfNode {
        SdfNode::new(operations::Shell::new(self, thickness))
    }

    /// Override the reported bounding box.
    ///
    /// Useful to crop an unbounded field (e.g. a plane) or to mesh a larger
    /// region than a primitive's tight bounds.
    fn with_bounds(self, bounds: Aabb) -> SdfNode {
        SdfNode::new(transforms::WithBounds::new(self, bounds))
    }
}

// Implement SdfExt for all types that implement Sdf
impl<T: Sdf + 'static> SdfExt for T {}

// Re-exports
pub use operations::*;
pub use primitives::*;
pub use transforms::*;
