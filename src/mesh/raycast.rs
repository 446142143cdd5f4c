//! Locating the surface along a voxel edge
//!
//! The primary method is a sphere trace: advance by the current distance
//! value, which cannot skip the surface when the oracle is a true distance
//! function. Fields that under-report distance (post-boolean, deformed, or
//! otherwise non-Lipschitz) can stall or overshoot the trace; a bisection
//! fallback preserves correctness there at lower accuracy.

use glam::DVec3;

use crate::sdf::Sdf;

/// Central-difference step for surface normals
pub(crate) const GRADIENT_STEP: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RaycastParams {
    pub scale_and_sigmoid: f64,
    pub step_scale: f64,
    pub epsilon: f64,
    pub max_steps: u32,
}

/// Sphere-trace from `a` towards `b` for a point within `epsilon` of the
/// surface. Returns `None` when the step budget or the travel limit
/// (twice the edge length) runs out, or when the hit lies past `b`.
pub(crate) fn raycast_edge<S: Sdf + ?Sized>(
    sdf: &S,
    a: DVec3,
    b: DVec3,
    params: &RaycastParams,
) -> Option<DVec3> {
    let dir = b - a;
    let length = dir.length();
    if length == 0.0 {
        return None;
    }
    let dir = dir / length;

    let mut t = 0.0;
    for _ in 0..params.max_steps {
        if t > 2.0 * length {
            break;
        }
        let p = a + dir * t;
        let d = sdf.distance(p);
        if d.abs() <= params.epsilon {
            // Hits beyond the far corner belong to some other edge
            return (t <= length).then_some(p);
        }
        // Optional sigmoid compression damps overshoot near the surface
        // when the field is not a true distance
        let step = if params.scale_and_sigmoid > 0.0 {
            params.scale_and_sigmoid * (d / params.scale_and_sigmoid).tanh()
        } else {
            d
        };
        t += step.abs() * params.step_scale;
    }
    None
}

/// Bisection fallback: 32 rounds of midpoint probing on `[a, b]`, returning
/// the probe with the smallest distance magnitude. Assumes the endpoint
/// signs differ; converges regardless of the field's Lipschitz behaviour.
pub(crate) fn bisect_edge<S: Sdf + ?Sized>(sdf: &S, a: DVec3, b: DVec3) -> DVec3 {
    let mut lo = a;
    let mut hi = b;
    let lo_inside = sdf.distance(a) < 0.0;

    let mut best = (a + b) * 0.5;
    let mut best_abs = f64::INFINITY;
    for _ in 0..32 {
        let mid = (lo + hi) * 0.5;
        let d = sdf.distance(mid);
        if d.abs() < best_abs {
            best_abs = d.abs();
            best = mid;
        }
        if (d < 0.0) == lo_inside {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    best
}

/// Unit surface normal from the central-difference gradient of the field.
///
/// Returns `DVec3::ZERO` when the gradient underflows; callers drop the
/// constraint in that case.
pub(crate) fn sdf_normal<S: Sdf + ?Sized>(sdf: &S, p: DVec3, h: f64) -> DVec3 {
    let g = DVec3::new(
        sdf.distance(p + DVec3::X * h) - sdf.distance(p - DVec3::X * h),
        sdf.distance(p + DVec3::Y * h) - sdf.distance(p - DVec3::Y * h),
        sdf.distance(p + DVec3::Z * h) - sdf.distance(p - DVec3::Z * h),
    );
    g.normalize_or_zero()
}
