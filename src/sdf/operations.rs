//! SDF Operations - booleans and modifiers

use super::{Aabb, Sdf};
use glam::DVec3;

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Union<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        self.a.distance(p).min(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Subtract<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        self.a.distance(p).max(-self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds() // Subtraction can only reduce, not expand
    }
}

/// Intersection of two SDFs (keep only overlap)
pub struct Intersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Intersect<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for Intersect<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        self.a.distance(p).max(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        // Intersection is smaller than either input
        self.a.bounds()
    }
}

/// Smooth union with polynomial blending
pub struct SmoothUnion<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f64,
}

impl<A: Sdf, B: Sdf> SmoothUnion<A, B> {
    pub fn new(a: A, b: B, k: f64) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf + Send + Sync, B: Sdf + Send + Sync> Sdf for SmoothUnion<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        let d1 = self.a.distance(p);
        let d2 = self.b.distance(p);
        let h = (0.5 + 0.5 * (d2 - d1) / self.k).clamp(0.0, 1.0);
        lerp(d2, d1, h) - self.k * h * (1.0 - h)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds()).expand(self.k)
    }
}

// ============================================================================
// Modifier Operations
// ============================================================================

/// Shell (hollow) operation
pub struct Shell<S: Sdf> {
    pub inner: S,
    pub thickness: f64,
}

impl<S: Sdf> Shell<S> {
    pub fn new(inner: S, thickness: f64) -> Self {
        Self { inner, thickness }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Shell<S> {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p).abs() - self.thickness
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().expand(self.thickness)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
