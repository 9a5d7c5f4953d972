//! Binary STL export of the extruded solid.

use std::fs;
use std::path::Path;

use girder_extrude::TriangleMesh;

use crate::GirderError;

/// Encode a mesh as binary STL.
///
/// Facet normals are recomputed from vertex positions rather than taken
/// from the mesh's shading normals, so smooth-shaded parts export with
/// correct per-facet normals too.
pub fn stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let num_triangles = mesh.indices.len() / 3;
    let mut data = Vec::with_capacity(84 + num_triangles * 50);

    let mut header = b"girder STL export".to_vec();
    header.resize(80, b' ');
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.indices.chunks(3) {
        let i0 = tri[0] as usize * 3;
        let i1 = tri[1] as usize * 3;
        let i2 = tri[2] as usize * 3;

        let v0 = [
            mesh.vertices[i0],
            mesh.vertices[i0 + 1],
            mesh.vertices[i0 + 2],
        ];
        let v1 = [
            mesh.vertices[i1],
            mesh.vertices[i1 + 1],
            mesh.vertices[i1 + 2],
        ];
        let v2 = [
            mesh.vertices[i2],
            mesh.vertices[i2 + 1],
            mesh.vertices[i2 + 2],
        ];

        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let nx = e1[1] * e2[2] - e1[2] * e2[1];
        let ny = e1[2] * e2[0] - e1[0] * e2[2];
        let nz = e1[0] * e2[1] - e1[1] * e2[0];
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        let (nx, ny, nz) = if len > 1e-10 {
            (nx / len, ny / len, nz / len)
        } else {
            (0.0, 0.0, 1.0)
        };

        data.extend_from_slice(&nx.to_le_bytes());
        data.extend_from_slice(&ny.to_le_bytes());
        data.extend_from_slice(&nz.to_le_bytes());
        for v in [v0, v1, v2] {
            data.extend_from_slice(&v[0].to_le_bytes());
            data.extend_from_slice(&v[1].to_le_bytes());
            data.extend_from_slice(&v[2].to_le_bytes());
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Write a mesh to a binary STL file.
pub fn write_stl(mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<(), GirderError> {
    fs::write(path, stl_bytes(mesh))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{section_mesh, SectionFamily, SectionRecord};

    #[test]
    fn test_stl_layout() {
        let record = SectionRecord::new("UC 200 boundary", 200.0, 150.0, 6.0, 9.0, 9.0);
        let mesh = section_mesh(&record, SectionFamily::UC).unwrap();
        let bytes = stl_bytes(&mesh);

        // 80-byte header + u32 count + 50 bytes per triangle.
        assert_eq!(bytes.len(), 84 + mesh.num_triangles() * 50);
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, mesh.num_triangles());
        assert!(bytes.starts_with(b"girder STL export"));
    }
}
