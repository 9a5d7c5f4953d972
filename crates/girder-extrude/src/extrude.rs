//! Extrude operation: sweep a closed section outline into a solid mesh.

use std::f64::consts::FRAC_PI_2;

use girder_math::{Point2, Point3, Vec2};
use girder_section::SectionProfile;

use crate::{ExtrusionConfig, TriangleMesh};

/// Extrude a closed profile along +Z into a watertight triangle mesh.
///
/// The solid spans `z` in `[0, depth]`; with the chamfer enabled the
/// caps recede to `-bevel_thickness` and `depth + bevel_thickness` while
/// the side walls expand outward by `bevel_size`, sweeping a quarter-arc
/// of `bevel_segments` facets between cap rim and wall.
///
/// The profile must be simple (guaranteed by profile construction from a
/// validated record); the result is undefined for a self-intersecting
/// outline.
pub fn extrude_profile(profile: &SectionProfile, config: &ExtrusionConfig) -> TriangleMesh {
    let corners = profile.corners();
    let miters = miter_directions(corners);

    // Ring schedule: (outline offset, z) pairs, z strictly increasing.
    let mut schedule: Vec<(f64, f64)> = Vec::new();
    if config.bevel_enabled && config.bevel_segments > 0 {
        let segs = config.bevel_segments;
        for k in 0..=segs {
            let t = k as f64 / segs as f64;
            let (sin_t, cos_t) = (t * FRAC_PI_2).sin_cos();
            schedule.push((config.bevel_size * sin_t, -config.bevel_thickness * cos_t));
        }
        for k in (0..=segs).rev() {
            let t = k as f64 / segs as f64;
            let (sin_t, cos_t) = (t * FRAC_PI_2).sin_cos();
            schedule.push((
                config.bevel_size * sin_t,
                config.depth + config.bevel_thickness * cos_t,
            ));
        }
    } else {
        schedule.push((0.0, 0.0));
        schedule.push((0.0, config.depth));
    }

    let rings: Vec<Vec<Point3>> = schedule
        .iter()
        .map(|&(offset, z)| offset_ring(corners, &miters, offset, z))
        .collect();

    let mut mesh = TriangleMesh::new();

    // Side walls: one quad per outline edge per ring band. The outline
    // is CCW viewed from +Z and z increases through the bands, so
    // bottom-edge-first winding faces outward.
    let n = corners.len();
    for band in rings.windows(2) {
        let (r0, r1) = (&band[0], &band[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.push_triangle(r0[i], r0[j], r1[j]);
            mesh.push_triangle(r0[i], r1[j], r1[i]);
        }
    }

    // End caps on the first and last rings. Ear-clip triangles are CCW
    // in the outline plane, which faces +Z: correct for the far cap,
    // flipped for the near cap.
    let triangles = ear_clip(corners);
    let near = rings.first().expect("ring schedule is never empty");
    let far = rings.last().expect("ring schedule is never empty");
    for [a, b, c] in &triangles {
        mesh.push_triangle(near[*a], near[*c], near[*b]);
    }
    for [a, b, c] in &triangles {
        mesh.push_triangle(far[*a], far[*b], far[*c]);
    }

    mesh
}

/// Per-corner outward offset directions.
///
/// For a CCW outline the outward normal of edge `(dx, dy)` is
/// `(dy, -dx)`. The miter vector `(n1 + n2) / (1 + n1.n2)` displaces
/// both adjacent edges by exactly the offset distance, which is exact
/// for the I-profile's right angles.
fn miter_directions(corners: &[Point2]) -> Vec<Vec2> {
    let n = corners.len();
    let edge_normal = |a: Point2, b: Point2| -> Vec2 {
        let d = b - a;
        let len = d.norm();
        Vec2::new(d.y / len, -d.x / len)
    };

    (0..n)
        .map(|i| {
            let prev = corners[(i + n - 1) % n];
            let next = corners[(i + 1) % n];
            let n1 = edge_normal(prev, corners[i]);
            let n2 = edge_normal(corners[i], next);
            (n1 + n2) / (1.0 + n1.dot(&n2))
        })
        .collect()
}

/// One ring of 3D outline points at height `z`, offset outward.
fn offset_ring(corners: &[Point2], miters: &[Vec2], offset: f64, z: f64) -> Vec<Point3> {
    corners
        .iter()
        .zip(miters)
        .map(|(p, m)| Point3::new(p.x + offset * m.x, p.y + offset * m.y, z))
        .collect()
}

/// Triangulate a simple CCW polygon by ear clipping.
///
/// Returns index triples into `points`. The I-profile is non-convex, so
/// fan triangulation is not an option here.
fn ear_clip(points: &[Point2]) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));
    let mut remaining: Vec<usize> = (0..points.len()).collect();

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut found_ear = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            let a = points[remaining[prev]];
            let b = points[remaining[i]];
            let c = points[remaining[next]];

            // Convex vertex check (CCW winding).
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if cross <= 0.0 {
                continue;
            }

            let mut is_ear = true;
            for j in 0..n {
                if j == prev || j == i || j == next {
                    continue;
                }
                if point_in_triangle(points[remaining[j]], a, b, c) {
                    is_ear = false;
                    break;
                }
            }

            if is_ear {
                triangles.push([remaining[prev], remaining[i], remaining[next]]);
                remaining.remove(i);
                found_ear = true;
                break;
            }
        }

        if !found_ear {
            // Degenerate input; bail rather than loop forever.
            break;
        }
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }

    triangles
}

/// Barycentric point-in-triangle test with a small epsilon so boundary
/// points do not block ears.
fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-30 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}
