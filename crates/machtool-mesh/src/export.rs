//! Binary STL export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use machtool_math::{Point3, Vec3};

use crate::mesh::Mesh;
use crate::{MeshError, Result};

fn stl_vertex(p: &Point3) -> stl_io::Vertex {
    stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
}

fn stl_triangles(mesh: &Mesh) -> Vec<stl_io::Triangle> {
    mesh.triangles()
        .map(|[a, b, c]| {
            let n = (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vec3::zeros);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [stl_vertex(&a), stl_vertex(&b), stl_vertex(&c)],
            }
        })
        .collect()
}

/// Write `mesh` as binary STL with per-face normals.
pub fn write_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    let triangles = stl_triangles(mesh);
    stl_io::write_stl(writer, triangles.iter()).map_err(MeshError::Stl)
}

/// Save `mesh` to a binary STL file.
pub fn save_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer)?;
    writer.flush().map_err(io_err)?;
    log::info!(
        "saved {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_revolved_mesh, MeshOptions, Profile};
    use std::io::Cursor;

    fn pin() -> Mesh {
        let profile = Profile::start(0.0, 0.0)
            .line_to(0.25, 0.0)
            .line_to(0.25, 1.0)
            .line_to(0.0, 1.0);
        let opts = MeshOptions {
            resolution: 8,
            ..MeshOptions::default()
        };
        build_revolved_mesh(&profile, &opts).unwrap()
    }

    #[test]
    fn test_write_stl_size() {
        let mesh = pin();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf).unwrap();
        // 80 byte header, u32 count, 50 bytes per triangle
        assert_eq!(buf.len(), 84 + 50 * mesh.triangle_count());
    }

    #[test]
    fn test_stl_reads_back() {
        let mesh = pin();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf).unwrap();
        let indexed = stl_io::read_stl(&mut Cursor::new(buf)).unwrap();
        assert_eq!(indexed.faces.len(), mesh.triangle_count());
        // stl_io merges equal positions: two ring of 8 plus two cap centers
        assert_eq!(indexed.vertices.len(), 18);
    }

    #[test]
    fn test_save_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pin.stl");
        save_stl(&pin(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 84);
    }
}
