//! STL file export (Binary format)
//!
//! STL (stereolithography) is a simple mesh format commonly used for 3D
//! printing. This implementation exports in binary STL format which is more
//! compact and widely supported than ASCII STL.
//!
//! STL stores a triangle soup of `f32` facets; vertex sharing and double
//! precision are lost in the file.

use crate::Result;
use crate::mesh::Mesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a mesh to binary STL format
///
/// Binary STL format:
/// - 80 bytes: Header (arbitrary text)
/// - 4 bytes: Number of triangles (u32 little-endian)
/// - For each triangle (50 bytes):
///   - 12 bytes: Normal vector (3 x f32 little-endian)
///   - 36 bytes: 3 vertices (9 x f32 little-endian)
///   - 2 bytes: Attribute byte count (0)
pub fn export_stl(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Header (80 bytes, padded with spaces)
    let header = format!(
        "Vostok STL Export - {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    let mut header_bytes = [b' '; 80];
    let header_len = header.len().min(80);
    header_bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    writer.write_all(&header_bytes)?;

    // Number of triangles (u32 little-endian)
    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    // Write each triangle
    for triangle in mesh.triangles() {
        let normal = triangle.normal();
        let normal = if normal == glam::DVec3::ZERO {
            // STL expects some normal even for a degenerate facet
            glam::DVec3::Z
        } else {
            normal
        };

        for component in [normal.x, normal.y, normal.z] {
            writer.write_all(&(component as f32).to_le_bytes())?;
        }
        for vertex in triangle.0 {
            for component in [vertex.x, vertex.y, vertex.z] {
                writer.write_all(&(component as f32).to_le_bytes())?;
            }
        }

        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("vostok_test_{}", name))
    }

    #[test]
    fn export_stl_single_triangle() {
        let mesh = Mesh {
            vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            indices: vec![0, 1, 2],
        };

        let path = temp_path("triangle.stl");
        export_stl(&mesh, &path).unwrap();

        // 80 (header) + 4 (count) + 50 (one triangle) = 134 bytes
        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 134);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn export_stl_cube() {
        // A cube has 12 triangles (2 per face * 6 faces)
        let vertices = vec![
            DVec3::new(-0.5, -0.5, 0.5),
            DVec3::new(0.5, -0.5, 0.5),
            DVec3::new(0.5, 0.5, 0.5),
            DVec3::new(-0.5, 0.5, 0.5),
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::new(0.5, -0.5, -0.5),
            DVec3::new(0.5, 0.5, -0.5),
            DVec3::new(-0.5, 0.5, -0.5),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 0, 2, 3, // front
            5, 4, 7, 5, 7, 6, // back
            4, 0, 3, 4, 3, 7, // left
            1, 5, 6, 1, 6, 2, // right
            3, 2, 6, 3, 6, 7, // top
            4, 5, 1, 4, 1, 0, // bottom
        ];
        let mesh = Mesh { vertices, indices };

        let path = temp_path("cube.stl");
        export_stl(&mesh, &path).unwrap();

        // 80 + 4 + (50 * 12) = 684 bytes
        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 684);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn triangle_count_matches_file_header() {
        let mesh = Mesh {
            vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        let path = temp_path("count.stl");
        export_stl(&mesh, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count, 2);

        let _ = std::fs::remove_file(&path);
    }
}
