//! Uniform dual contouring
//!
//! One vertex per surface-crossing voxel, placed by least squares over the
//! surface planes sampled on the voxel's edges, then quads stitched across
//! every interior edge the surface crosses. Sharp edges and corners survive
//! because the vertex is free to sit at the intersection of its planes
//! instead of on a grid line.

use std::collections::HashMap;

use glam::{DVec3, IVec3};
use rayon::prelude::*;

use crate::mesh::MeshConfig;
use crate::mesh::grid::{CornerField, VoxelGrid};
use crate::mesh::qef::QefSolver;
use crate::mesh::raycast::{self, GRADIENT_STEP, RaycastParams};
use crate::sdf::Sdf;

// ============================================================================
// Cell topology tables
// ============================================================================

/// Cell corners numbered by the bit pattern `(x << 2) | (y << 1) | z`
const CORNERS: [IVec3; 8] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 1, 1),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 0, 1),
    IVec3::new(1, 1, 0),
    IVec3::new(1, 1, 1),
];

/// The 12 cell edges as corner index pairs
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (1, 3),
    (1, 5),
    (2, 3),
    (2, 6),
    (3, 7),
    (4, 5),
    (4, 6),
    (5, 7),
    (6, 7),
];

/// The three edges anchored at corner 7, one per axis. Every interior edge
/// of the grid is the far edge of exactly one cell, so stitching only these
/// visits each quad once.
const FAR_EDGES: [(usize, usize); 3] = [(3, 7), (5, 7), (6, 7)];

/// Cells sharing each axis' far edge, in stitching order
const FAR_EDGE_NEIGHBORS: [[IVec3; 3]; 3] = [
    [IVec3::new(0, 0, 1), IVec3::new(0, 1, 0), IVec3::new(0, 1, 1)],
    [IVec3::new(0, 0, 1), IVec3::new(1, 0, 0), IVec3::new(1, 0, 1)],
    [IVec3::new(0, 1, 0), IVec3::new(1, 0, 0), IVec3::new(1, 1, 0)],
];

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal conditions encountered during a render.
///
/// Each kind is logged through `tracing` at most once per render and
/// reported back in [`RenderStats`](crate::mesh::RenderStats); none of them
/// stop mesh generation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeshWarnings {
    /// An edge raycast ran out of budget and fell back to bisection
    pub raycast_fallback: bool,
    /// A QEF system was singular; the cell center was used instead
    pub qef_failed: bool,
    /// A vertex landed too far from its cell and was clamped into it
    pub vertex_clamped: bool,
    /// A surface-crossing edge lacked a neighbour vertex; the mesh has a hole
    pub missing_neighbor: bool,
}

impl MeshWarnings {
    /// Whether any warning was raised
    pub fn any(&self) -> bool {
        self.raycast_fallback || self.qef_failed || self.vertex_clamped || self.missing_neighbor
    }

    fn merge(&mut self, other: Self) {
        self.raycast_fallback |= other.raycast_fallback;
        self.qef_failed |= other.qef_failed;
        self.vertex_clamped |= other.vertex_clamped;
        self.missing_neighbor |= other.missing_neighbor;
    }

    pub(crate) fn log(&self) {
        if self.raycast_fallback {
            tracing::warn!(
                "edge raycast failed to converge (try adjusting raycast options), \
                 used lower-accuracy bisection"
            );
        }
        if self.qef_failed {
            tracing::warn!("vertex positioning failed, used cell center");
        }
        if self.vertex_clamped {
            tracing::warn!("generated a vertex far outside its voxel, clamped into the cell");
        }
        if self.missing_neighbor {
            tracing::warn!("no vertex found to complete a face, the mesh will have holes");
        }
    }
}

// ============================================================================
// Phase one: vertex placement
// ============================================================================

/// A cell that produced a vertex
pub(crate) struct VoxelInfo {
    pub cell: IVec3,
    pub buf_index: u32,
    pub mask: u8,
}

/// Placed vertices plus the two indices the stitcher walks: the ordered
/// voxel sequence and the cell-to-vertex map.
pub(crate) struct VertexBuffer {
    pub positions: Vec<DVec3>,
    pub voxels: Vec<VoxelInfo>,
    pub by_cell: HashMap<IVec3, u32>,
}

/// Corner inside/outside mask for a cell; bit `i` set when corner `i` is
/// strictly inside the surface.
fn cell_mask(field: &CornerField, cell: IVec3) -> u8 {
    let mut mask = 0u8;
    for (i, offset) in CORNERS.iter().enumerate() {
        if field.value(cell + *offset) < 0.0 {
            mask |= 1 << i;
        }
    }
    mask
}

/// Place one vertex in every cell the surface crosses.
///
/// Cells are processed in parallel; results carry their cell index and are
/// merged in grid order, so buffer layout is deterministic regardless of
/// scheduling.
pub(crate) fn place_vertices<S: Sdf + Sync + ?Sized>(
    sdf: &S,
    grid: &VoxelGrid,
    field: &CornerField,
    config: &MeshConfig,
) -> (VertexBuffer, MeshWarnings) {
    let params = RaycastParams {
        scale_and_sigmoid: config.raycast_scale_and_sigmoid,
        step_scale: config.raycast_step_scale,
        epsilon: config.raycast_epsilon,
        max_steps: config.raycast_max_steps,
    };

    let placed: Vec<(IVec3, u8, DVec3, MeshWarnings)> = (0..grid.cell_count())
        .into_par_iter()
        .filter_map(|index| {
            let cell = grid.cell_at(index);
            let mask = cell_mask(field, cell);
            if mask == 0 || mask == 0xFF {
                // Fully inside or outside the volume: no vertex to place
                return None;
            }
            let mut warnings = MeshWarnings::default();
            let position = place_vertex(sdf, grid, cell, mask, config, &params, &mut warnings);
            Some((cell, mask, position, warnings))
        })
        .collect();

    let mut warnings = MeshWarnings::default();
    let mut buffer = VertexBuffer {
        positions: Vec::with_capacity(placed.len()),
        voxels: Vec::with_capacity(placed.len()),
        by_cell: HashMap::with_capacity(placed.len()),
    };
    for (cell, mask, position, cell_warnings) in placed {
        let buf_index = buffer.positions.len() as u32;
        buffer.positions.push(position);
        buffer.by_cell.insert(cell, buf_index);
        buffer.voxels.push(VoxelInfo {
            cell,
            buf_index,
            mask,
        });
        warnings.merge(cell_warnings);
    }
    (buffer, warnings)
}

fn place_vertex<S: Sdf + ?Sized>(
    sdf: &S,
    grid: &VoxelGrid,
    cell: IVec3,
    mask: u8,
    config: &MeshConfig,
    params: &RaycastParams,
    warnings: &mut MeshWarnings,
) -> DVec3 {
    let cell_start = grid.cell_start(cell);
    let cell_size = grid.cell_size;
    let cell_center = cell_start + cell_size * 0.5;

    // Collect a plane per surface-crossing edge
    let mut qef = QefSolver::new();
    let mut crossings = 0;
    for &(c0, c1) in &EDGES {
        if (mask >> c0) & 1 == (mask >> c1) & 1 {
            continue; // Not a crossing edge
        }
        let a = cell_start + CORNERS[c0].as_dvec3() * cell_size;
        let b = cell_start + CORNERS[c1].as_dvec3() * cell_size;
        let surface = match raycast::raycast_edge(sdf, a, b, params) {
            Some(p) => p,
            None => {
                warnings.raycast_fallback = true;
                raycast::bisect_edge(sdf, a, b)
            }
        };
        let normal = raycast::sdf_normal(sdf, surface, GRADIENT_STEP);
        if normal != DVec3::ZERO {
            qef.add_plane(normal, normal.dot(surface));
        }
        crossings += 1;
        if crossings == 6 {
            break; // A cell boundary cannot cross more than 6 edges
        }
    }

    // A weak push towards the voxel center keeps the system full-rank for
    // surfaces that are flat along an axis (a cylinder cap, a box face)
    if config.center_push > 0.0 {
        for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
            let normal = axis * config.center_push;
            qef.add_plane(normal, normal.dot(cell_center));
        }
    }

    let mut position = match qef.solve() {
        Some(p) => p,
        None => {
            warnings.qef_failed = true;
            cell_center
        }
    };

    // A vertex far outside its voxel tends to generate bad triangles
    let offset = (position - cell_center).abs();
    if offset.x > config.far_away * cell_size.x
        || offset.y > config.far_away * cell_size.y
        || offset.z > config.far_away * cell_size.z
    {
        warnings.vertex_clamped = true;
        position = position.clamp(cell_start, cell_start + cell_size);
    }

    position
}

// ============================================================================
// Phase two: stitching
// ============================================================================

/// Connect the vertices of the four cells around every surface-crossing far
/// edge into two triangles, wound so face normals point out of the solid.
///
/// `emit` receives index triples into the vertex buffer; degenerate
/// triangles (repeated vertex position) are dropped here.
pub(crate) fn stitch(
    buffer: &VertexBuffer,
    warnings: &mut MeshWarnings,
    mut emit: impl FnMut([u32; 3]),
) {
    for voxel in &buffer.voxels {
        for (axis, &(c0, c1)) in FAR_EDGES.iter().enumerate() {
            if (voxel.mask >> c0) & 1 == (voxel.mask >> c1) & 1 {
                continue; // The surface does not cross this edge
            }

            let offsets = &FAR_EDGE_NEIGHBORS[axis];
            let neighbors = (
                buffer.by_cell.get(&(voxel.cell + offsets[0])),
                buffer.by_cell.get(&(voxel.cell + offsets[1])),
                buffer.by_cell.get(&(voxel.cell + offsets[2])),
            );
            let (Some(&k1), Some(&k2), Some(&k3)) = neighbors else {
                // Crossing edge at the grid boundary (or a neighbour the
                // placer skipped): the quad cannot be completed
                warnings.missing_neighbor = true;
                continue;
            };
            let k0 = voxel.buf_index;

            let mut t0 = [k0, k1, k3];
            let mut t1 = [k0, k3, k2];

            // Orient the pair by which end of the edge is inside; the axis
            // parity term accounts for the handedness of the neighbour
            // ordering above
            if ((voxel.mask >> c0) & 1) != (axis as u8 & 1) {
                t0.swap(1, 2);
                t1.swap(1, 2);
            }

            for tri in [t0, t1] {
                let [a, b, c] = tri.map(|k| buffer.positions[k as usize]);
                if a != b && b != c && a != c {
                    emit(tri);
                }
            }
        }
    }
}
