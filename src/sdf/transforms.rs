//! SDF Transforms - translation, rotation, scale, mirroring

use super::{Aabb, Sdf};
use glam::{DQuat, DVec3};

// ============================================================================
// Basic Transforms
// ============================================================================

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: DVec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: DVec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Translate<S> {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        Aabb::new(b.min + self.offset, b.max + self.offset)
    }
}

/// Rotation transform
pub struct Rotate<S: Sdf> {
    pub inner: S,
    pub rotation: DQuat,
    pub inverse: DQuat,
}

impl<S: Sdf> Rotate<S> {
    pub fn new(inner: S, rotation: DQuat) -> Self {
        Self {
            inner,
            rotation,
            inverse: rotation.inverse(),
        }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Rotate<S> {
    fn distance(&self, p: DVec3) -> f64 {
        // Rotate point into local space
        self.inner.distance(self.inverse * p)
    }

    fn bounds(&self) -> Aabb {
        // AABB of the rotated corners of the inner box
        let b = self.inner.bounds();
        let corners = [
            DVec3::new(b.min.x, b.min.y, b.min.z),
            DVec3::new(b.max.x, b.min.y, b.min.z),
            DVec3::new(b.min.x, b.max.y, b.min.z),
            DVec3::new(b.max.x, b.max.y, b.min.z),
            DVec3::new(b.min.x, b.min.y, b.max.z),
            DVec3::new(b.max.x, b.min.y, b.max.z),
            DVec3::new(b.min.x, b.max.y, b.max.z),
            DVec3::new(b.max.x, b.max.y, b.max.z),
        ];

        let mut new_min = DVec3::splat(f64::MAX);
        let mut new_max = DVec3::splat(f64::MIN);

        for corner in corners {
            let rotated = self.rotation * corner;
            new_min = new_min.min(rotated);
            new_max = new_max.max(rotated);
        }

        Aabb::new(new_min, new_max)
    }
}

/// Uniform scale transform
pub struct Scale<S: Sdf> {
    pub inner: S,
    pub factor: f64,
}

impl<S: Sdf> Scale<S> {
    pub fn new(inner: S, factor: f64) -> Self {
        Self { inner, factor }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Scale<S> {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p / self.factor) * self.factor
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        Aabb::new(b.min * self.factor, b.max * self.factor)
    }
}

/// Mirror across a plane through origin
pub struct Mirror<S: Sdf> {
    pub inner: S,
    pub axis: DVec3,
}

impl<S: Sdf> Mirror<S> {
    pub fn new(inner: S, axis: DVec3) -> Self {
        Self {
            inner,
            axis: axis.normalize(),
        }
    }
}

impl<S: Sdf + Send + Sync> Sdf for Mirror<S> {
    fn distance(&self, p: DVec3) -> f64 {
        // Reflect points from the negative half-space
        let d = p.dot(self.axis);
        let p_mirrored = if d < 0.0 { p - 2.0 * d * self.axis } else { p };
        self.inner.distance(p_mirrored)
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        let mirrored_min = reflect_point(b.min, self.axis);
        let mirrored_max = reflect_point(b.max, self.axis);
        Aabb::new(
            b.min.min(mirrored_min).min(b.max).min(mirrored_max),
            b.max.max(mirrored_max).max(b.min).max(mirrored_min),
        )
    }
}

/// Bounding-box override
///
/// Leaves the field untouched and reports the given box instead of the
/// inner shape's own. The mesher samples exactly the reported region.
pub struct WithBounds<S: Sdf> {
    pub inner: S,
    pub bounds: Aabb,
}

impl<S: Sdf> WithBounds<S> {
    pub fn new(inner: S, bounds: Aabb) -> Self {
        Self { inner, bounds }
    }
}

impl<S: Sdf + Send + Sync> Sdf for WithBounds<S> {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

fn reflect_point(p: DVec3, axis: DVec3) -> DVec3 {
    p - 2.0 * p.dot(axis) * axis
}
