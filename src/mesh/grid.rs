//! Voxel grid derivation and the corner evaluation field

use std::fmt;

use glam::{DVec3, IVec3};
use rayon::prelude::*;

use crate::sdf::{Aabb, Sdf};
use crate::{Error, Result};

/// Uniform voxel grid derived from an oracle's bounding box.
///
/// `resolution` is the edge length on the longest axis; per-axis cell counts
/// are rounded so the cells tile the box exactly, which makes `cell_size`
/// close to (but not exactly) cubic for anisotropic boxes.
#[derive(Debug, Clone, Copy)]
pub struct VoxelGrid {
    pub bounds: Aabb,
    pub cells: IVec3,
    pub cell_size: DVec3,
    pub resolution: f64,
}

impl VoxelGrid {
    /// Derive a grid with `mesh_cells` cells along the longest axis.
    pub fn from_bounds(bounds: Aabb, mesh_cells: u32) -> Result<Self> {
        if mesh_cells == 0 {
            return Err(Error::InvalidParameter(
                "mesh_cells must be at least 1".to_string(),
            ));
        }
        let size = bounds.size();
        if !bounds.min.is_finite() || !bounds.max.is_finite() || !size.cmpgt(DVec3::ZERO).all() {
            return Err(Error::InvalidParameter(format!(
                "degenerate bounding box: {:?} .. {:?}",
                bounds.min, bounds.max
            )));
        }

        let resolution = size.max_element() / mesh_cells as f64;
        let cells = (size / resolution).round().as_ivec3().max(IVec3::ONE);
        let cell_size = size / cells.as_dvec3();

        Ok(Self {
            bounds,
            cells,
            cell_size,
            resolution,
        })
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        (self.cells.x as usize) * (self.cells.y as usize) * (self.cells.z as usize)
    }

    /// Minimum corner of a cell
    pub fn cell_start(&self, cell: IVec3) -> DVec3 {
        self.bounds.min + cell.as_dvec3() * self.cell_size
    }

    /// Center of a cell
    pub fn cell_center(&self, cell: IVec3) -> DVec3 {
        self.cell_start(cell) + self.cell_size * 0.5
    }

    /// Whether a cell index lies inside the grid
    pub fn contains_cell(&self, cell: IVec3) -> bool {
        cell.cmpge(IVec3::ZERO).all() && cell.cmplt(self.cells).all()
    }

    /// Cell triple for a linear index (x-major, z fastest)
    pub(crate) fn cell_at(&self, index: usize) -> IVec3 {
        let cz = self.cells.z as usize;
        let cy = self.cells.y as usize;
        IVec3::new(
            (index / (cz * cy)) as i32,
            ((index / cz) % cy) as i32,
            (index % cz) as i32,
        )
    }
}

impl fmt::Display for VoxelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} cells, resolution {:.3}",
            self.cells.x, self.cells.y, self.cells.z, self.resolution
        )
    }
}

/// Signed distances at every grid corner.
///
/// The working set of corner points is `(cells + 1)` per axis; each corner is
/// evaluated exactly once, in parallel, and shared by the up to 8 cells that
/// touch it. Keying by integer corner triple avoids comparing recomputed
/// floating-point coordinates for equality.
pub(crate) struct CornerField {
    values: Vec<f64>,
    dims: IVec3,
}

impl CornerField {
    pub fn sample<S: Sdf + Sync + ?Sized>(sdf: &S, grid: &VoxelGrid) -> Self {
        let dims = grid.cells + IVec3::ONE;
        let total = (dims.x as usize) * (dims.y as usize) * (dims.z as usize);
        let min = grid.bounds.min;
        let cell_size = grid.cell_size;

        let values = (0..total)
            .into_par_iter()
            .map(|index| {
                let corner = corner_at(dims, index);
                sdf.distance(min + corner.as_dvec3() * cell_size)
            })
            .collect();

        Self { values, dims }
    }

    /// Distance at an integer corner, `0 <= corner <= cells` per axis
    pub fn value(&self, corner: IVec3) -> f64 {
        let dz = self.dims.z as usize;
        let dy = self.dims.y as usize;
        let index = ((corner.x as usize) * dy + corner.y as usize) * dz + corner.z as usize;
        self.values[index]
    }
}

fn corner_at(dims: IVec3, index: usize) -> IVec3 {
    let dz = dims.z as usize;
    let dy = dims.y as usize;
    IVec3::new(
        (index / (dz * dy)) as i32,
        ((index / dz) % dy) as i32,
        (index % dz) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::sphere;
    use approx::assert_relative_eq;

    #[test]
    fn isotropic_box_gets_equal_cells() {
        let grid = VoxelGrid::from_bounds(Aabb::cube(1.2), 20).unwrap();
        assert_eq!(grid.cells, IVec3::splat(20));
        assert_relative_eq!(grid.resolution, 2.4 / 20.0, epsilon = 1e-12);
        assert_relative_eq!(grid.cell_size.x, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn anisotropic_box_rounds_per_axis() {
        let bounds = Aabb::new(
            DVec3::new(-3.2, -1.2, -1.2),
            DVec3::new(3.2, 1.2, 1.2),
        );
        let grid = VoxelGrid::from_bounds(bounds, 40).unwrap();
        assert_eq!(grid.cells.x, 40);
        // 2.4 / 0.16 = 15 cells on the short axes
        assert_eq!(grid.cells.y, 15);
        assert_eq!(grid.cells.z, 15);
    }

    #[test]
    fn extreme_aspect_keeps_at_least_one_cell() {
        let bounds = Aabb::new(DVec3::ZERO, DVec3::new(100.0, 0.1, 100.0));
        let grid = VoxelGrid::from_bounds(bounds, 10).unwrap();
        assert_eq!(grid.cells.y, 1);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(VoxelGrid::from_bounds(Aabb::cube(1.0), 0).is_err());
        let flat = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
        assert!(VoxelGrid::from_bounds(flat, 8).is_err());
        let inverted = Aabb::new(DVec3::ONE, -DVec3::ONE);
        assert!(VoxelGrid::from_bounds(inverted, 8).is_err());
    }

    #[test]
    fn cell_start_tiles_the_box() {
        let grid = VoxelGrid::from_bounds(Aabb::cube(1.0), 4).unwrap();
        assert_relative_eq!(grid.cell_start(IVec3::ZERO).x, -1.0, epsilon = 1e-12);
        let last = grid.cell_start(grid.cells - IVec3::ONE) + grid.cell_size;
        assert_relative_eq!(last.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cell_at_inverts_linear_index() {
        let grid = VoxelGrid::from_bounds(Aabb::cube(1.0), 3).unwrap();
        let mut seen = std::collections::HashSet::new();
        for index in 0..grid.cell_count() {
            let cell = grid.cell_at(index);
            assert!(grid.contains_cell(cell));
            assert!(seen.insert(cell));
        }
        assert_eq!(seen.len(), 27);
    }

    #[test]
    fn corner_field_matches_direct_evaluation() {
        let s = sphere(1.0);
        let grid = VoxelGrid::from_bounds(Aabb::cube(1.2), 8).unwrap();
        let field = CornerField::sample(&s, &grid);

        let corner = IVec3::new(4, 4, 4); // grid center
        assert_relative_eq!(field.value(corner), -1.0, epsilon = 1e-12);
        let origin = IVec3::ZERO;
        assert_relative_eq!(
            field.value(origin),
            DVec3::splat(-1.2).length() - 1.0,
            epsilon = 1e-12
        );
    }
}
