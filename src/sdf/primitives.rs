//! SDF Primitive shapes
//!
//! All primitives are centered at the origin. Use transforms to position them.

use super::{Aabb, Sdf};
use glam::{DVec2, DVec3};

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a sphere with given radius
pub fn sphere(radius: f64) -> Sphere {
    Sphere::new(radius)
}

/// Create a box with given half-extents (size/2 in each direction)
pub fn box3(half_extents: DVec3) -> Box3 {
    Box3::new(half_extents)
}

/// Create a cube with given size
pub fn cube(size: f64) -> Box3 {
    Box3::new(DVec3::splat(size * 0.5))
}

/// Create a rounded box
pub fn rounded_box(half_extents: DVec3, radius: f64) -> RoundedBox {
    RoundedBox::new(half_extents, radius)
}

/// Create a cylinder (Y-axis aligned) with given radius and height
pub fn cylinder(radius: f64, height: f64) -> Cylinder {
    Cylinder::new(radius, height)
}

/// Create a capsule (Y-axis aligned) with given radius and height
pub fn capsule(radius: f64, height: f64) -> Capsule {
    Capsule::new(radius, height)
}

/// Create a torus (donut) lying in the XZ plane
pub fn torus(major_radius: f64, minor_radius: f64) -> Torus {
    Torus::new(major_radius, minor_radius)
}

/// Create a plane with given normal and offset from origin
pub fn plane(normal: DVec3, offset: f64) -> Plane {
    Plane::new(normal, offset)
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: DVec3) -> f64 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius)
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: DVec3,
}

impl Box3 {
    pub fn new(half_extents: DVec3) -> Self {
        Self { half_extents }
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: DVec3) -> f64 {
        let q = p.abs() - self.half_extents;
        q.max(DVec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Box with rounded edges
#[derive(Debug, Clone, Copy)]
pub struct RoundedBox {
    pub half_extents: DVec3,
    pub radius: f64,
}

impl RoundedBox {
    pub fn new(half_extents: DVec3, radius: f64) -> Self {
        Self {
            half_extents,
            radius,
        }
    }
}

impl Sdf for RoundedBox {
    fn distance(&self, p: DVec3) -> f64 {
        let q = p.abs() - self.half_extents + DVec3::splat(self.radius);
        q.max(DVec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0) - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Cylinder aligned with Y axis
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub radius: f64,
    pub half_height: f64,
}

impl Cylinder {
    pub fn new(radius: f64, height: f64) -> Self {
        Self {
            radius,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for Cylinder {
    fn distance(&self, p: DVec3) -> f64 {
        let d = DVec2::new(DVec2::new(p.x, p.z).length(), p.y).abs()
            - DVec2::new(self.radius, self.half_height);
        d.x.max(d.y).min(0.0) + d.max(DVec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec3::new(-self.radius, -self.half_height, -self.radius),
            DVec3::new(self.radius, self.half_height, self.radius),
        )
    }
}

/// Capsule (cylinder with hemispherical caps) aligned with Y axis
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    pub radius: f64,
    pub half_height: f64,
}

impl Capsule {
    pub fn new(radius: f64, height: f64) -> Self {
        Self {
            radius,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for Capsule {
    fn distance(&self, p: DVec3) -> f64 {
        let p_clamped = DVec3::new(p.x, p.y.clamp(-self.half_height, self.half_height), p.z);
        (p - p_clamped).length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        let h = self.half_height + self.radius;
        Aabb::new(
            DVec3::new(-self.radius, -h, -self.radius),
            DVec3::new(self.radius, h, self.radius),
        )
    }
}

/// Torus (donut) lying in the XZ plane
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl Torus {
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Sdf for Torus {
    fn distance(&self, p: DVec3) -> f64 {
        let q = DVec2::new(
            DVec2::new(p.x, p.z).length() - self.major_radius,
            p.y,
        );
        q.length() - self.minor_radius
    }

    fn bounds(&self) -> Aabb {
        let r = self.major_radius + self.minor_radius;
        Aabb::new(
            DVec3::new(-r, -self.minor_radius, -r),
            DVec3::new(r, self.minor_radius, r),
        )
    }
}

/// Infinite plane
///
/// The reported bounds are a large cube; crop with
/// [`SdfExt::with_bounds`](crate::sdf::SdfExt::with_bounds) or an
/// intersection before meshing.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: DVec3,
    pub offset: f64,
}

impl Plane {
    pub fn new(normal: DVec3, offset: f64) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }
}

impl Sdf for Plane {
    fn distance(&self, p: DVec3) -> f64 {
        p.dot(self.normal) + self.offset
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(1000.0)
    }
}
