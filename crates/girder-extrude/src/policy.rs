//! Presentation constants per section family.
//!
//! The rendered solid is a display proportion, not a physical beam
//! length: columns read best a little stockier than beams. Those
//! proportions live here as a data-driven policy so new families are
//! additive and never edits to shared extrusion code.

use girder_section::{SectionFamily, SectionRecord};

/// Millimetres per metre.
const MM_PER_M: f64 = 1000.0;

/// Family-keyed presentation policy.
pub struct VariantPolicy;

impl VariantPolicy {
    /// Chamfer subdivision count for the root-radius approximation.
    pub const BEVEL_SEGMENTS: u32 = 3;

    /// Extrusion depth as a multiple of section height.
    pub fn depth_multiplier(family: SectionFamily) -> f64 {
        match family {
            SectionFamily::UC => 2.0,
            SectionFamily::UB => 2.5,
        }
    }

    /// Extrusion depth in metres for a section of the given height.
    pub fn extrusion_depth(family: SectionFamily, height_m: f64) -> f64 {
        height_m * Self::depth_multiplier(family)
    }
}

/// Parameters controlling one extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionConfig {
    /// Sweep distance along +Z in metres.
    pub depth: f64,
    /// Whether outline edges get the chamfer treatment.
    pub bevel_enabled: bool,
    /// Chamfer extent along Z in metres.
    pub bevel_thickness: f64,
    /// Chamfer extent in the outline plane in metres.
    pub bevel_size: f64,
    /// Number of planar facets in the chamfer quarter-arc.
    pub bevel_segments: u32,
}

impl ExtrusionConfig {
    /// Derive the configuration for a record/family pair.
    ///
    /// Depth comes from [`VariantPolicy`]; chamfer thickness and size
    /// both equal the tabulated root radius (scaled to metres). The
    /// chamfer is capped below half the clear web height so the
    /// expanded outline can never self-intersect; tabulated sections
    /// sit far under the cap, which only guards hand-entered records.
    ///
    /// The record must already satisfy [`SectionRecord::validate`];
    /// configuration derivation performs no validation of its own.
    pub fn for_section(record: &SectionRecord, family: SectionFamily) -> Self {
        let height_m = record.height_mm / MM_PER_M;
        let clear_web_m = (record.height_mm - 2.0 * record.flange_thickness_mm) / MM_PER_M;
        let bevel = (record.root_radius_mm / MM_PER_M).min(0.45 * clear_web_m);

        Self {
            depth: VariantPolicy::extrusion_depth(family, height_m),
            bevel_enabled: true,
            bevel_thickness: bevel,
            bevel_size: bevel,
            bevel_segments: VariantPolicy::BEVEL_SEGMENTS,
        }
    }

    /// Total Z extent of the extruded solid, chamfer included.
    pub fn total_depth(&self) -> f64 {
        if self.bevel_enabled {
            self.depth + 2.0 * self.bevel_thickness
        } else {
            self.depth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_multipliers_exact() {
        // Presentation constants: must stay stable so visual comparisons
        // within a family remain consistent.
        assert_eq!(
            VariantPolicy::extrusion_depth(SectionFamily::UC, 0.2),
            0.4
        );
        assert_eq!(
            VariantPolicy::extrusion_depth(SectionFamily::UB, 0.2),
            0.5
        );
    }

    #[test]
    fn test_config_for_boundary_scenario() {
        let record = SectionRecord::new("UC 200 boundary", 200.0, 150.0, 6.0, 9.0, 9.0);
        let config = ExtrusionConfig::for_section(&record, SectionFamily::UC);
        assert_eq!(config.depth, 0.4);
        assert!(config.bevel_enabled);
        assert!((config.bevel_thickness - 0.009).abs() < 1e-12);
        assert!((config.bevel_size - 0.009).abs() < 1e-12);
        assert_eq!(config.bevel_segments, 3);
    }

    #[test]
    fn test_oversized_root_radius_capped() {
        // Clear web height is 2 mm; a 9 mm radius would make the expanded
        // outline self-intersect, so it is capped below 1 mm.
        let record = SectionRecord::new("thin", 100.0, 100.0, 0.5, 49.0, 9.0);
        let config = ExtrusionConfig::for_section(&record, SectionFamily::UB);
        assert!(config.bevel_size < 0.001);
        assert!(config.bevel_size > 0.0);
    }
}
