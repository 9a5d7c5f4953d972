#![warn(missing_docs)]

//! Rolled steel section records and cross-section profile construction.
//!
//! A [`SectionRecord`] carries the tabulated dimensions of a UC or UB
//! section in millimetres, exactly as they appear in a section table row.
//! [`SectionProfile::from_record`] validates the record and traces the
//! closed I-profile outline in metres, ready for extrusion.
//!
//! # Example
//!
//! ```
//! use girder_section::{SectionProfile, SectionRecord};
//!
//! let record = SectionRecord::new("UC 203x203x46", 203.2, 203.6, 7.2, 11.0, 10.2);
//! let profile = SectionProfile::from_record(&record).unwrap();
//! assert_eq!(profile.points().len(), 13);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod catalog;
pub mod profile;
pub mod properties;

pub use catalog::SectionCatalog;
pub use profile::SectionProfile;
pub use properties::SectionProperties;

/// Errors raised by section validation and catalog lookup.
#[derive(Debug, Error)]
pub enum SectionError {
    /// A tabulated dimension is zero or negative.
    #[error("section dimension '{name}' must be positive, got {value} mm")]
    NonPositiveDimension {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value in millimetres.
        value: f64,
    },

    /// The web is at least as thick as the flange is wide.
    #[error("web thickness {web_mm} mm must be less than flange width {width_mm} mm")]
    WebWiderThanFlange {
        /// Web thickness in millimetres.
        web_mm: f64,
        /// Flange width in millimetres.
        width_mm: f64,
    },

    /// The two flanges meet or cross at mid-height, so the outline would
    /// self-intersect.
    #[error("flanges overlap: 2 x {flange_mm} mm >= section height {height_mm} mm")]
    FlangeOverlap {
        /// Flange thickness in millimetres.
        flange_mm: f64,
        /// Overall section height in millimetres.
        height_mm: f64,
    },

    /// Catalog lookup failed.
    #[error("no section designated '{0}' in catalog")]
    UnknownDesignation(String),
}

/// Product family of a rolled section.
///
/// UC (universal column) and UB (universal beam) share the same
/// cross-section topology; they differ in proportions and in the
/// presentation constants applied downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionFamily {
    /// Universal column.
    UC,
    /// Universal beam.
    UB,
}

impl fmt::Display for SectionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFamily::UC => write!(f, "UC"),
            SectionFamily::UB => write!(f, "UB"),
        }
    }
}

impl FromStr for SectionFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UC" => Ok(SectionFamily::UC),
            "UB" => Ok(SectionFamily::UB),
            other => Err(format!("unknown section family '{other}' (expected UC or UB)")),
        }
    }
}

/// One row of a section table: the tabulated dimensions of a rolled
/// section, in millimetres.
///
/// Records arrive already parsed from the external section database; this
/// crate validates only the geometric invariants needed to build a
/// non-degenerate profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Section designation, e.g. `"UC 203x203x46"`.
    pub designation: String,
    /// Overall depth of section (mm).
    pub height_mm: f64,
    /// Flange width (mm).
    pub width_mm: f64,
    /// Web thickness (mm).
    pub web_thickness_mm: f64,
    /// Flange thickness (mm).
    pub flange_thickness_mm: f64,
    /// Root fillet radius between web and flange (mm).
    pub root_radius_mm: f64,
}

impl SectionRecord {
    /// Create a record from raw dimensions.
    pub fn new(
        designation: impl Into<String>,
        height_mm: f64,
        width_mm: f64,
        web_thickness_mm: f64,
        flange_thickness_mm: f64,
        root_radius_mm: f64,
    ) -> Self {
        Self {
            designation: designation.into(),
            height_mm,
            width_mm,
            web_thickness_mm,
            flange_thickness_mm,
            root_radius_mm,
        }
    }

    /// Check the geometric invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule:
    /// - every dimension must be strictly positive
    /// - the web must be thinner than the flange is wide
    /// - twice the flange thickness must be strictly less than the height
    ///   (otherwise the outline self-intersects at mid-height)
    pub fn validate(&self) -> Result<(), SectionError> {
        let fields = [
            ("height_mm", self.height_mm),
            ("width_mm", self.width_mm),
            ("web_thickness_mm", self.web_thickness_mm),
            ("flange_thickness_mm", self.flange_thickness_mm),
            ("root_radius_mm", self.root_radius_mm),
        ];
        for (name, value) in fields {
            if value <= 0.0 {
                return Err(SectionError::NonPositiveDimension { name, value });
            }
        }

        if self.web_thickness_mm >= self.width_mm {
            return Err(SectionError::WebWiderThanFlange {
                web_mm: self.web_thickness_mm,
                width_mm: self.width_mm,
            });
        }

        if 2.0 * self.flange_thickness_mm >= self.height_mm {
            return Err(SectionError::FlangeOverlap {
                flange_mm: self.flange_thickness_mm,
                height_mm: self.height_mm,
            });
        }

        Ok(())
    }
}
