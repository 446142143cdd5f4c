//! # Vostok
//!
//! Code-first solid modelling through signed distance fields.
//!
//! Shapes are defined as SDFs (primitives combined with boolean operations
//! and transforms), then converted to watertight triangle meshes by a dual
//! contouring mesher that preserves sharp edges and corners.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vostok::prelude::*;
//!
//! // A plate with a cylindrical hole through it
//! let part = box3(DVec3::new(1.0, 0.2, 1.0))
//!     .subtract(cylinder(0.3, 1.0));
//!
//! // Mesh and export
//! let mesh = part.to_mesh(MeshConfig::default().with_mesh_cells(128))?;
//! mesh.export_stl("part.stl")?;
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: arbitrary object-space units. Negative is inside,
//!   positive is outside, zero is on the surface.
//! - **Angles**: all rotation functions use **radians**
//! - **Precision**: all geometry uses `f64`; export casts to `f32` where a
//!   file format requires it
//! - **Coordinate system**: right-handed; triangles are wound
//!   counter-clockwise seen from outside the solid

pub mod export;
pub mod mesh;
pub mod sdf;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // SDF primitives and composition
    pub use crate::sdf::{Aabb, Sdf, SdfExt, SdfNode, primitives::*};

    // Mesh generation
    pub use crate::mesh::{
        Mesh, MeshConfig, MeshWarnings, RenderStats, SdfToMesh, Triangle, TriangleSink, VoxelGrid,
        generate_mesh, render_sdf,
    };

    // Export
    pub use crate::export::{ExportFormat, MeshExport};

    // Math (re-export glam)
    pub use glam::{DMat3, DQuat, DVec3, IVec3};

    // Error handling
    pub use crate::{Error, Result};
}
