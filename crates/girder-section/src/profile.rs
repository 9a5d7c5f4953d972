//! Closed cross-section outline construction.

use girder_math::{Point2, Tolerance};

use crate::{SectionError, SectionRecord};

/// Millimetres per metre; tabulated dimensions are normalized to metres
/// before any geometry is built, which fixes the physical scale of the
/// rendered solid against the unit-length camera rig.
const MM_PER_M: f64 = 1000.0;

/// The closed 2D outline of an I/H cross-section, in metres.
///
/// The outline holds 13 points: the 12 distinct corners of the profile
/// plus an explicit closing return to the first point. It is centered on
/// the origin, symmetric about both axes, and wound counter-clockwise
/// (so the extruded side walls face outward).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProfile {
    points: Vec<Point2>,
}

impl SectionProfile {
    /// Build the profile for a validated record.
    ///
    /// The trace starts at the bottom-left flange tip and runs
    /// counter-clockwise: across the bottom flange, up into the web, out
    /// along the top flange, and back down the far side.
    ///
    /// # Errors
    ///
    /// Rejects any record that violates a [`SectionRecord::validate`]
    /// invariant; in particular the degenerate case where the flanges
    /// meet at mid-height is refused rather than emitting a
    /// self-intersecting outline.
    pub fn from_record(record: &SectionRecord) -> Result<Self, SectionError> {
        record.validate()?;

        let h = record.height_mm / MM_PER_M;
        let w = record.width_mm / MM_PER_M;
        let tw = record.web_thickness_mm / MM_PER_M;
        let tf = record.flange_thickness_mm / MM_PER_M;

        let points = vec![
            Point2::new(-w / 2.0, -h / 2.0),
            Point2::new(w / 2.0, -h / 2.0),
            Point2::new(w / 2.0, -h / 2.0 + tf),
            Point2::new(tw / 2.0, -h / 2.0 + tf),
            Point2::new(tw / 2.0, h / 2.0 - tf),
            Point2::new(w / 2.0, h / 2.0 - tf),
            Point2::new(w / 2.0, h / 2.0),
            Point2::new(-w / 2.0, h / 2.0),
            Point2::new(-w / 2.0, h / 2.0 - tf),
            Point2::new(-tw / 2.0, h / 2.0 - tf),
            Point2::new(-tw / 2.0, -h / 2.0 + tf),
            Point2::new(-w / 2.0, -h / 2.0 + tf),
            Point2::new(-w / 2.0, -h / 2.0),
        ];

        Ok(Self { points })
    }

    /// All outline points, closing point included.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The 12 distinct corner points (closing point stripped).
    pub fn corners(&self) -> &[Point2] {
        &self.points[..self.points.len() - 1]
    }

    /// Iterate over the outline edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of outline edges (one per distinct corner).
    pub fn edge_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Overall height of the outline in metres.
    pub fn height(&self) -> f64 {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        max - min
    }

    /// Check that no two non-adjacent edges intersect.
    ///
    /// Holds for every outline built from a validated record; exposed so
    /// callers handing outlines to the extruder can assert the simplicity
    /// precondition in debug builds and tests.
    pub fn is_simple(&self) -> bool {
        let edges: Vec<(Point2, Point2)> = self.edges().collect();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                // Skip adjacent edges (they share an endpoint), including
                // the wrap-around pair of the first and last edge.
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                if segments_intersect(edges[i].0, edges[i].1, edges[j].0, edges[j].1) {
                    return false;
                }
            }
        }
        true
    }
}

/// Proper segment intersection test via orientation signs.
fn segments_intersect(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let orient = |p: Point2, q: Point2, r: Point2| -> f64 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    };

    let tol = Tolerance::DEFAULT.linear;
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);

    if ((d1 > tol && d2 < -tol) || (d1 < -tol && d2 > tol))
        && ((d3 > tol && d4 < -tol) || (d3 < -tol && d4 > tol))
    {
        return true;
    }

    // Collinear overlap: treat touching endpoints of non-adjacent edges
    // as an intersection too.
    let on_segment = |p: Point2, q: Point2, r: Point2| -> bool {
        r.x >= p.x.min(q.x) - tol
            && r.x <= p.x.max(q.x) + tol
            && r.y >= p.y.min(q.y) - tol
            && r.y <= p.y.max(q.y) + tol
    };

    (d1.abs() <= tol && on_segment(c, d, a))
        || (d2.abs() <= tol && on_segment(c, d, b))
        || (d3.abs() <= tol && on_segment(a, b, c))
        || (d4.abs() <= tol && on_segment(a, b, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SectionRecord;

    fn boundary_record() -> SectionRecord {
        SectionRecord::new("UC 200 boundary", 200.0, 150.0, 6.0, 9.0, 9.0)
    }

    #[test]
    fn test_thirteen_points() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        assert_eq!(profile.points().len(), 13);
        assert_eq!(profile.corners().len(), 12);
        assert_eq!(profile.edge_count(), 12);
    }

    #[test]
    fn test_outline_closes() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        let first = profile.points()[0];
        let last = *profile.points().last().unwrap();
        assert_eq!(first, last);
    }

    #[test]
    fn test_boundary_scenario_first_point() {
        // heightMm=200, widthMm=150 => first point at (-0.075, -0.1) metres.
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        let p = profile.points()[0];
        assert!((p.x - (-0.075)).abs() < 1e-12);
        assert!((p.y - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_double_symmetry() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        let corners = profile.corners();

        // For each corner, its mirror images about both axes are also
        // corners of the outline.
        for p in corners {
            let x_mirror = Point2::new(-p.x, p.y);
            let y_mirror = Point2::new(p.x, -p.y);
            assert!(
                corners.iter().any(|q| (q - x_mirror).norm() < 1e-12),
                "missing x-mirror of {p:?}"
            );
            assert!(
                corners.iter().any(|q| (q - y_mirror).norm() < 1e-12),
                "missing y-mirror of {p:?}"
            );
        }
    }

    #[test]
    fn test_simple_for_valid_inputs() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        assert!(profile.is_simple());

        // A slender UB-like record.
        let ub = SectionRecord::new("UB 406x178x54", 402.6, 177.7, 7.7, 10.9, 10.2);
        let profile = SectionProfile::from_record(&ub).unwrap();
        assert!(profile.is_simple());

        // Extreme-but-legal proportions stay simple too.
        let thin = SectionRecord::new("thin", 100.0, 100.0, 0.5, 49.0, 1.0);
        let profile = SectionProfile::from_record(&thin).unwrap();
        assert!(profile.is_simple());
    }

    #[test]
    fn test_counter_clockwise_winding() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        // Shoelace signed area is positive for CCW outlines.
        let mut area2 = 0.0;
        for (a, b) in profile.edges() {
            area2 += a.x * b.y - b.x * a.y;
        }
        assert!(area2 > 0.0);
    }

    #[test]
    fn test_idempotent_bit_identical() {
        let record = boundary_record();
        let a = SectionProfile::from_record(&record).unwrap();
        let b = SectionProfile::from_record(&record).unwrap();
        // PartialEq on f64 is exact, so this asserts bit-identical output.
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_rejected_before_any_geometry() {
        let record = SectionRecord::new("degenerate", 20.0, 150.0, 6.0, 15.0, 9.0);
        assert!(SectionProfile::from_record(&record).is_err());
    }

    #[test]
    fn test_height_matches_record() {
        let profile = SectionProfile::from_record(&boundary_record()).unwrap();
        assert!((profile.height() - 0.2).abs() < 1e-12);
    }
}
