//! Least-squares vertex placement from plane constraints
//!
//! Each surface crossing contributes an oriented plane `n · x = d`. The
//! vertex minimising the summed squared point-to-plane distances solves the
//! 3x3 normal equations `AᵀA x = Aᵀb`, accumulated incrementally and solved
//! by LU with partial pivoting.

use glam::{DMat3, DVec3};

const PIVOT_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub(crate) struct QefSolver {
    ata: DMat3,
    atb: DVec3,
    planes: usize,
}

impl QefSolver {
    pub fn new() -> Self {
        Self {
            ata: DMat3::ZERO,
            atb: DVec3::ZERO,
            planes: 0,
        }
    }

    /// Add the constraint `normal · x = d`
    pub fn add_plane(&mut self, normal: DVec3, d: f64) {
        // Rank-1 update of the normal matrix
        self.ata += DMat3::from_cols(normal * normal.x, normal * normal.y, normal * normal.z);
        self.atb += normal * d;
        self.planes += 1;
    }

    /// Minimiser of the accumulated error, or `None` when the system is
    /// singular (all constraint normals coplanar) or produced non-finite
    /// values.
    pub fn solve(&self) -> Option<DVec3> {
        if self.planes < 3 {
            return None;
        }
        lu_solve(self.ata, self.atb).filter(|x| x.is_finite())
    }
}

/// Solve `m x = b` by LU decomposition with partial pivoting.
fn lu_solve(m: DMat3, b: DVec3) -> Option<DVec3> {
    let mut a = [
        m.row(0).to_array(),
        m.row(1).to_array(),
        m.row(2).to_array(),
    ];
    let mut b = b.to_array();

    for k in 0..3 {
        let mut pivot = k;
        for r in k + 1..3 {
            if a[r][k].abs() > a[pivot][k].abs() {
                pivot = r;
            }
        }
        if !(a[pivot][k].abs() > PIVOT_EPSILON) {
            return None;
        }
        a.swap(k, pivot);
        b.swap(k, pivot);

        for r in k + 1..3 {
            let factor = a[r][k] / a[k][k];
            for c in k..3 {
                a[r][c] -= factor * a[k][c];
            }
            b[r] -= factor * b[k];
        }
    }

    let mut x = [0.0; 3];
    for k in (0..3).rev() {
        let mut sum = b[k];
        for c in k + 1..3 {
            sum -= a[k][c] * x[c];
        }
        x[k] = sum / a[k][k];
    }
    Some(DVec3::from_array(x))
}
