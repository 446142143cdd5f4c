//! Mesh generation from SDFs using dual contouring
//!
//! The mesher samples the oracle's bounding box on a uniform voxel grid,
//! places one vertex in every cell the surface crosses (a least-squares fit
//! against the surface planes found on the cell's edges, which preserves
//! sharp features), and stitches neighbouring vertices into triangles.
//! Uses Rayon for parallel processing of the voxel grid.

mod dual_contouring;
mod grid;
mod qef;
mod raycast;

use glam::DVec3;

use crate::Result;
use crate::sdf::{Aabb, Sdf};

pub use dual_contouring::MeshWarnings;
pub use grid::VoxelGrid;

use dual_contouring::{VertexBuffer, place_vertices, stitch};
use grid::CornerField;

/// Widens the sampled domain so the outermost corner layer lies strictly
/// inside it even when the surface touches the reported box.
const DOMAIN_MARGIN: f64 = 1e-12;

/// A single triangle as three points in object space, counter-clockwise
/// seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle(pub [DVec3; 3]);

impl Triangle {
    /// Face normal (unit length, zero for degenerate triangles)
    pub fn normal(&self) -> DVec3 {
        let [a, b, c] = self.0;
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Centroid of the three vertices
    pub fn centroid(&self) -> DVec3 {
        (self.0[0] + self.0[1] + self.0[2]) / 3.0
    }

    /// Whether any two vertices coincide exactly
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.0;
        a == b || b == c || a == c
    }

    /// The same triangle with reversed winding
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.0;
        Self([a, c, b])
    }
}

/// Consumer of the triangle stream produced by a render.
///
/// Emission order is an implementation detail; sinks must not rely on it.
pub trait TriangleSink {
    fn accept(&mut self, triangle: Triangle);
}

impl TriangleSink for Vec<Triangle> {
    fn accept(&mut self, triangle: Triangle) {
        self.push(triangle);
    }
}

/// Bounded-queue sink. A dropped receiver means the consumer gave up;
/// remaining triangles are discarded and the render completes.
impl TriangleSink for std::sync::mpsc::SyncSender<Triangle> {
    fn accept(&mut self, triangle: Triangle) {
        let _ = self.send(triangle);
    }
}

/// An indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<DVec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the triangles as point triples
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks(3).map(|tri| {
            Triangle([
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ])
        })
    }

    /// Bounding box of the vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        Some(Aabb::new(min, max))
    }
}

/// Configuration for mesh generation
///
/// The defaults favour robustness; `far_away` and `center_push` trade
/// feature sharpness against resistance to bad triangles, and the raycast
/// options matter mostly for fields that are not true distance functions.
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Number of cells along the longest axis of the bounding box
    pub mesh_cells: u32,
    /// Maximum vertex displacement from the cell center, as a fraction of
    /// the cell size per axis; vertices beyond it are clamped into the cell
    pub far_away: f64,
    /// Weight of the center-biasing planes added to every QEF; larger is
    /// more robust but rounds sharp features
    pub center_push: f64,
    /// Sigmoid compression scale for raycast steps; 0 disables
    pub raycast_scale_and_sigmoid: f64,
    /// Multiplier on the distance value per raycast step
    pub raycast_step_scale: f64,
    /// Surface hit tolerance for the raycast
    pub raycast_epsilon: f64,
    /// Step budget per edge raycast
    pub raycast_max_steps: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            mesh_cells: 64,
            far_away: 0.499999,
            center_push: 1.0,
            raycast_scale_and_sigmoid: 0.0,
            raycast_step_scale: 1.0,
            raycast_epsilon: 1e-4,
            raycast_max_steps: 1000,
        }
    }
}

impl MeshConfig {
    pub fn with_mesh_cells(mut self, mesh_cells: u32) -> Self {
        self.mesh_cells = mesh_cells;
        self
    }

    pub fn with_far_away(mut self, far_away: f64) -> Self {
        self.far_away = far_away;
        self
    }

    pub fn with_center_push(mut self, center_push: f64) -> Self {
        self.center_push = center_push;
        self
    }
}

/// Summary of one render
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    /// Vertices placed (one per surface-crossing cell)
    pub vertices: usize,
    /// Triangles emitted to the sink
    pub triangles: usize,
    /// Non-fatal conditions encountered
    pub warnings: MeshWarnings,
}

/// Extension trait to generate meshes from SDFs
pub trait SdfToMesh: Sdf + Sync {
    /// Generate an indexed mesh from this SDF
    fn to_mesh(&self, config: MeshConfig) -> Result<Mesh> {
        generate_mesh(self, &config)
    }

    /// Generate a mesh with default config
    fn to_mesh_default(&self) -> Result<Mesh> {
        self.to_mesh(MeshConfig::default())
    }
}

impl<T: Sdf + Sync + ?Sized> SdfToMesh for T {}

/// Render an SDF, streaming triangles into `sink`.
///
/// Triangles are emitted as they are stitched; the sink sees them before
/// the render returns and never needs the whole mesh in memory.
pub fn render_sdf<S, T>(sdf: &S, config: &MeshConfig, sink: &mut T) -> Result<RenderStats>
where
    S: Sdf + Sync + ?Sized,
    T: TriangleSink,
{
    let (buffer, mut warnings) = prepare(sdf, config)?;

    let mut triangles = 0;
    stitch(&buffer, &mut warnings, |tri| {
        sink.accept(Triangle(tri.map(|k| buffer.positions[k as usize])));
        triangles += 1;
    });
    warnings.log();

    Ok(RenderStats {
        vertices: buffer.positions.len(),
        triangles,
        warnings,
    })
}

/// Render an SDF into an indexed mesh.
///
/// The mesh shares vertices between triangles (one vertex per
/// surface-crossing voxel), which downstream consumers generally prefer
/// over a triangle soup.
pub fn generate_mesh<S: Sdf + Sync + ?Sized>(sdf: &S, config: &MeshConfig) -> Result<Mesh> {
    let (buffer, mut warnings) = prepare(sdf, config)?;

    let mut indices = Vec::new();
    stitch(&buffer, &mut warnings, |tri| {
        indices.extend_from_slice(&tri);
    });
    warnings.log();

    Ok(Mesh {
        vertices: buffer.positions,
        indices,
    })
}

/// Phase one shared by both entry points: derive the grid, sample the
/// corner field, place vertices. The returned buffer is complete before any
/// stitching starts.
fn prepare<S: Sdf + Sync + ?Sized>(
    sdf: &S,
    config: &MeshConfig,
) -> Result<(VertexBuffer, MeshWarnings)> {
    let mut bounds = sdf.bounds();
    bounds.max += DVec3::splat(DOMAIN_MARGIN);
    let grid = VoxelGrid::from_bounds(bounds, config.mesh_cells)?;
    let field = CornerField::sample(sdf, &grid);
    Ok(place_vertices(sdf, &grid, &field, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::SdfExt;
    use crate::sdf::primitives::sphere;

    struct Empty;
    impl Sdf for Empty {
        fn distance(&self, _p: DVec3) -> f64 {
            1.0
        }
        fn bounds(&self) -> Aabb {
            Aabb::cube(1.0)
        }
    }

    #[test]
    fn empty_field_renders_no_triangles() {
        let stats = render_sdf(&Empty, &MeshConfig::default().with_mesh_cells(8), &mut Vec::new())
            .unwrap();
        assert_eq!(stats.vertices, 0);
        assert_eq!(stats.triangles, 0);
        assert!(!stats.warnings.any());
    }

    #[test]
    fn solid_field_renders_no_triangles() {
        struct Solid;
        impl Sdf for Solid {
            fn distance(&self, _p: DVec3) -> f64 {
                -1.0
            }
            fn bounds(&self) -> Aabb {
                Aabb::cube(1.0)
            }
        }
        let mesh = generate_mesh(&Solid, &MeshConfig::default().with_mesh_cells(8)).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn zero_mesh_cells_is_rejected_before_evaluation() {
        struct Panicking;
        impl Sdf for Panicking {
            fn distance(&self, _p: DVec3) -> f64 {
                panic!("oracle must not be evaluated");
            }
            fn bounds(&self) -> Aabb {
                Aabb::cube(1.0)
            }
        }
        let result = generate_mesh(&Panicking, &MeshConfig::default().with_mesh_cells(0));
        assert!(matches!(result, Err(crate::Error::InvalidParameter(_))));
    }

    #[test]
    fn streaming_and_indexed_renders_agree() {
        let s = sphere(1.0).with_bounds(Aabb::cube(1.2));
        let config = MeshConfig::default().with_mesh_cells(10);

        let mut streamed = Vec::new();
        let stats = render_sdf(&s, &config, &mut streamed).unwrap();
        let mesh = generate_mesh(&s, &config).unwrap();

        assert_eq!(stats.triangles, mesh.triangle_count());
        assert_eq!(stats.vertices, mesh.vertex_count());
        for (a, b) in streamed.iter().zip(mesh.triangles()) {
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn sync_sender_sink_streams_triangles() {
        let s = sphere(1.0).with_bounds(Aabb::cube(1.2));
        let config = MeshConfig::default().with_mesh_cells(6);

        let (mut tx, rx) = std::sync::mpsc::sync_channel(4096);
        let stats = render_sdf(&s, &config, &mut tx).unwrap();
        drop(tx);
        assert_eq!(rx.into_iter().count(), stats.triangles);
    }

    #[test]
    fn triangle_helpers() {
        let t = Triangle([DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(t.normal(), DVec3::Z);
        assert_eq!(t.flipped().normal(), -DVec3::Z);
        assert!(!t.is_degenerate());
        assert!(Triangle([DVec3::ZERO, DVec3::ZERO, DVec3::Y]).is_degenerate());
    }

    #[test]
    fn mesh_bounds_cover_all_vertices() {
        let s = sphere(1.0).with_bounds(Aabb::cube(1.2));
        let mesh = generate_mesh(&s, &MeshConfig::default().with_mesh_cells(8)).unwrap();
        let bounds = mesh.bounds().unwrap();
        for &v in &mesh.vertices {
            assert!(bounds.contains(v));
        }
    }
}
