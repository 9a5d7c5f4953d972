#![warn(missing_docs)]

//! girder — rolled steel sections as interactive 3D solids.
//!
//! The pipeline: a tabulated [`SectionRecord`] becomes a closed
//! cross-section outline ([`SectionProfile`]), the outline is extruded
//! into a watertight [`TriangleMesh`] with a chamfer approximating the
//! root fillet, and a [`SceneController`] renders the solid with orbit
//! controls and a slow turntable spin.
//!
//! # Example
//!
//! ```
//! use girder::{section_mesh, SectionFamily, SectionRecord};
//!
//! let record = SectionRecord::new("UC 203x203x46", 203.2, 203.6, 7.2, 11.0, 10.2);
//! let mesh = section_mesh(&record, SectionFamily::UC).unwrap();
//! assert!(mesh.num_triangles() > 0);
//! ```
//!
//! Opening an interactive view needs a GPU:
//!
//! ```no_run
//! use girder::{open_view, SectionFamily, SectionRecord};
//!
//! let record = SectionRecord::new("UB 406x178x54", 402.6, 177.7, 7.7, 10.9, 10.2);
//! let mut view = open_view(&record, SectionFamily::UB, 640, 360).unwrap();
//! view.scene.advance(1.0 / 60.0);
//! let frame = view.scene.render_frame().unwrap();
//! assert_eq!(frame.len(), 640 * 360 * 4);
//! view.close();
//! ```

use thiserror::Error;

pub mod export;

pub use girder_extrude::{extrude_profile, uv_sphere, ExtrusionConfig, TriangleMesh, VariantPolicy};
pub use girder_render::{GpuContext, OrbitCamera, RenderError, SceneController, ROTATION_RATE};
pub use girder_section::{
    SectionCatalog, SectionError, SectionFamily, SectionProfile, SectionProperties, SectionRecord,
};

/// Radius of the shear-centre marker sphere in metres.
const MARKER_RADIUS: f64 = 0.02;

/// Errors surfaced by the high-level API.
#[derive(Debug, Error)]
pub enum GirderError {
    /// The record violates a section geometry invariant.
    #[error(transparent)]
    Section(#[from] SectionError),

    /// The render surface is unavailable (no GPU, device failure).
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An I/O error during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the extruded solid for a record/family pair.
///
/// Validation happens before any geometry exists: an invalid record
/// returns [`SectionError`] and nothing is built.
pub fn section_mesh(
    record: &SectionRecord,
    family: SectionFamily,
) -> Result<TriangleMesh, GirderError> {
    let profile = SectionProfile::from_record(record)?;
    let config = ExtrusionConfig::for_section(record, family);
    Ok(extrude_profile(&profile, &config))
}

/// A live view: the scene controller plus the record it displays.
///
/// Dropping the handle (or calling [`ViewHandle::close`]) releases every
/// GPU resource the view allocated.
pub struct ViewHandle {
    /// The render loop driver; the viewport host calls
    /// `advance`/`render_frame` on it each tick.
    pub scene: SceneController,
    record: SectionRecord,
    family: SectionFamily,
}

impl ViewHandle {
    /// The record this view displays.
    pub fn record(&self) -> &SectionRecord {
        &self.record
    }

    /// The family this view displays.
    pub fn family(&self) -> SectionFamily {
        self.family
    }

    /// Close the view, releasing its GPU resources.
    pub fn close(self) {
        drop(self);
    }
}

/// Open an interactive view for a section.
///
/// Builds all geometry synchronously (profile, extrusion, marker),
/// uploads it once, and returns a handle ready for the frame loop.
///
/// # Errors
///
/// [`GirderError::Section`] if the record is invalid (checked before any
/// GPU resource is allocated); [`GirderError::Render`] if no render
/// surface can be acquired (surfaced once, not retried).
pub fn open_view(
    record: &SectionRecord,
    family: SectionFamily,
    width: u32,
    height: u32,
) -> Result<ViewHandle, GirderError> {
    let profile = SectionProfile::from_record(record)?;
    let config = ExtrusionConfig::for_section(record, family);
    let solid = extrude_profile(&profile, &config);
    let marker = uv_sphere(MARKER_RADIUS, 16, 16);

    let ctx = GpuContext::init_blocking()?;
    let scene = SceneController::new(ctx, &solid, &marker, width, height)?;

    Ok(ViewHandle {
        scene,
        record: record.clone(),
        family,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_record() -> SectionRecord {
        SectionRecord::new("UC 200 boundary", 200.0, 150.0, 6.0, 9.0, 9.0)
    }

    #[test]
    fn test_section_mesh_boundary_scenario() {
        let mesh = section_mesh(&boundary_record(), SectionFamily::UC).unwrap();
        assert!(mesh.num_triangles() > 0);

        // depth = 0.2 x 2.0 = 0.4 m, plus the 9 mm chamfer at each cap.
        let max_z = mesh
            .vertices
            .chunks(3)
            .map(|v| v[2])
            .fold(f32::NEG_INFINITY, f32::max);
        let min_z = mesh
            .vertices
            .chunks(3)
            .map(|v| v[2])
            .fold(f32::INFINITY, f32::min);
        assert!((f64::from(max_z - min_z) - (0.4 + 2.0 * 0.009)).abs() < 1e-6);
    }

    #[test]
    fn test_family_changes_depth_only_through_policy() {
        let uc = section_mesh(&boundary_record(), SectionFamily::UC).unwrap();
        let ub = section_mesh(&boundary_record(), SectionFamily::UB).unwrap();
        let z_span = |mesh: &TriangleMesh| {
            let zs: Vec<f32> = mesh.vertices.chunks(3).map(|v| v[2]).collect();
            let max = zs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let min = zs.iter().cloned().fold(f32::INFINITY, f32::min);
            f64::from(max - min)
        };
        // UB solids are 2.5/2.0 deeper, chamfer aside.
        assert!((z_span(&ub) - z_span(&uc) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_record_rejected_before_mesh() {
        let record = SectionRecord::new("degenerate", 20.0, 150.0, 6.0, 15.0, 9.0);
        match section_mesh(&record, SectionFamily::UC) {
            Err(GirderError::Section(SectionError::FlangeOverlap { .. })) => {}
            other => panic!("expected FlangeOverlap, got {other:?}"),
        }
    }

    #[test]
    #[ignore = "requires GPU"]
    fn test_open_close_view_cycle() {
        for _ in 0..3 {
            match open_view(&boundary_record(), SectionFamily::UC, 64, 64) {
                Ok(mut view) => {
                    view.scene.advance(0.016);
                    let frame = view.scene.render_frame().unwrap();
                    assert_eq!(frame.len(), 64 * 64 * 4);
                    view.close();
                }
                Err(GirderError::Render(RenderError::NoAdapter)) => return,
                Err(e) => panic!("{e}"),
            }
        }
    }
}
