//! Output triangle mesh for rendering and export.

use std::f64::consts::PI;

use girder_math::{Point3, Vec3};

/// A renderable triangle mesh.
///
/// Flat arrays in the layout GPU upload and STL export expect. Normals
/// are per-vertex; the extruder emits duplicated vertices per facet so
/// the chamfered solid shades flat.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Append one flat-shaded triangle, duplicating its vertices.
    ///
    /// The facet normal comes from the winding (counter-clockwise seen
    /// from outside), so callers control orientation through vertex
    /// order alone.
    pub fn push_triangle(&mut self, a: Point3, b: Point3, c: Point3) {
        let e1 = b - a;
        let e2 = c - a;
        let n = e1.cross(&e2);
        let len = n.norm();
        let n = if len > 1e-15 { n / len } else { Vec3::z() };

        let base = self.num_vertices() as u32;
        for p in [a, b, c] {
            self.vertices.push(p.x as f32);
            self.vertices.push(p.y as f32);
            self.vertices.push(p.z as f32);
            self.normals.push(n.x as f32);
            self.normals.push(n.y as f32);
            self.normals.push(n.z as f32);
        }
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Signed enclosed volume via the divergence theorem.
    ///
    /// Positive for a closed mesh with outward-facing normals; used by
    /// callers to estimate steel tonnage and by tests to prove
    /// orientation.
    pub fn signed_volume(&self) -> f64 {
        let mut vol = 0.0;
        for tri in self.indices.chunks(3) {
            let (i0, i1, i2) = (
                tri[0] as usize * 3,
                tri[1] as usize * 3,
                tri[2] as usize * 3,
            );
            let v0 = [
                self.vertices[i0] as f64,
                self.vertices[i0 + 1] as f64,
                self.vertices[i0 + 2] as f64,
            ];
            let v1 = [
                self.vertices[i1] as f64,
                self.vertices[i1 + 1] as f64,
                self.vertices[i1 + 2] as f64,
            ];
            let v2 = [
                self.vertices[i2] as f64,
                self.vertices[i2 + 1] as f64,
                self.vertices[i2 + 2] as f64,
            ];
            vol += v0[0] * (v1[1] * v2[2] - v2[1] * v1[2])
                - v1[0] * (v0[1] * v2[2] - v2[1] * v0[2])
                + v2[0] * (v0[1] * v1[2] - v1[1] * v0[2]);
        }
        vol / 6.0
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a smooth-shaded UV sphere centered at the origin.
///
/// Used for the shear-centre marker in the rendered scene. Normals are
/// radial, so the marker shades smoothly regardless of segment count.
pub fn uv_sphere(radius: f64, lat_segments: u32, lon_segments: u32) -> TriangleMesh {
    let lat = lat_segments.max(2) as usize;
    let lon = lon_segments.max(3) as usize;

    let mut mesh = TriangleMesh::new();

    // (lat+1) rings of (lon+1) vertices; the seam column is duplicated so
    // indexing stays a simple grid.
    for i in 0..=lat {
        let theta = PI * (i as f64) / (lat as f64);
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..=lon {
            let phi = 2.0 * PI * (j as f64) / (lon as f64);
            let (sin_p, cos_p) = phi.sin_cos();
            let n = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            mesh.vertices.push((radius * n.x) as f32);
            mesh.vertices.push((radius * n.y) as f32);
            mesh.vertices.push((radius * n.z) as f32);
            mesh.normals.push(n.x as f32);
            mesh.normals.push(n.y as f32);
            mesh.normals.push(n.z as f32);
        }
    }

    let cols = (lon + 1) as u32;
    for i in 0..lat as u32 {
        for j in 0..lon as u32 {
            let a = i * cols + j;
            let b = a + cols;
            // Two triangles per grid cell, wound outward; degenerate at
            // the poles but harmless (zero-area triangles collapse in
            // rasterization).
            mesh.indices.extend([a, a + 1, b]);
            mesh.indices.extend([a + 1, b + 1, b]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_triangle_normal_from_winding() {
        let mut mesh = TriangleMesh::new();
        mesh.push_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_vertices(), 3);
        // CCW in the XY plane faces +Z.
        assert!((mesh.normals[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = TriangleMesh::new();
        a.push_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let mut b = TriangleMesh::new();
        b.push_triangle(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        a.merge(&b);
        assert_eq!(a.num_triangles(), 2);
        assert_eq!(a.indices[3..6], [3, 4, 5]);
    }

    #[test]
    fn test_sphere_volume_approaches_analytic() {
        let r = 0.02;
        let mesh = uv_sphere(r, 16, 16);
        let expected = 4.0 / 3.0 * PI * r.powi(3);
        let vol = mesh.signed_volume();
        assert!(vol > 0.0, "sphere normals must face outward");
        assert!(
            (vol - expected).abs() < expected * 0.05,
            "expected ~{expected:e}, got {vol:e}"
        );
    }
}
