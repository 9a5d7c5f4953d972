//! JSON section catalogs.
//!
//! The surrounding system keeps section tables in a database; this crate
//! only ever sees them as a JSON array of records per family, the shape
//! the external API serves them in.

use serde::{Deserialize, Serialize};

use crate::{SectionError, SectionFamily, SectionRecord};

/// One family's section table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionCatalog {
    /// The family every record in this catalog belongs to.
    pub family: SectionFamily,
    /// The tabulated sections.
    pub sections: Vec<SectionRecord>,
}

impl SectionCatalog {
    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the catalog to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up a record by designation (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn find(&self, designation: &str) -> Result<&SectionRecord, SectionError> {
        let wanted = designation.trim();
        self.sections
            .iter()
            .find(|s| s.designation.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SectionError::UnknownDesignation(designation.to_string()))
    }

    /// Number of sections in the catalog.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> SectionCatalog {
        SectionCatalog {
            family: SectionFamily::UC,
            sections: vec![
                SectionRecord::new("UC 152x152x23", 152.4, 152.2, 5.8, 6.8, 7.6),
                SectionRecord::new("UC 203x203x46", 203.2, 203.6, 7.2, 11.0, 10.2),
            ],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = sample_catalog();
        let json = catalog.to_json().unwrap();
        let back = SectionCatalog::from_json(&json).unwrap();
        assert_eq!(back.family, SectionFamily::UC);
        assert_eq!(back.len(), 2);
        assert_eq!(back.sections[1].designation, "UC 203x203x46");
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = sample_catalog();
        let record = catalog.find("uc 203x203x46").unwrap();
        assert_eq!(record.height_mm, 203.2);
        assert!(catalog.find(" UC 152x152x23 ").is_ok());
    }

    #[test]
    fn test_find_unknown_designation() {
        let catalog = sample_catalog();
        assert!(matches!(
            catalog.find("UC 999x999x999"),
            Err(SectionError::UnknownDesignation(_))
        ));
    }

    #[test]
    fn test_parse_external_shape() {
        // The shape the external API serves: family tag plus rows.
        let json = r#"{
            "family": "UB",
            "sections": [{
                "designation": "UB 406x178x54",
                "height_mm": 402.6,
                "width_mm": 177.7,
                "web_thickness_mm": 7.7,
                "flange_thickness_mm": 10.9,
                "root_radius_mm": 10.2
            }]
        }"#;
        let catalog = SectionCatalog::from_json(json).unwrap();
        assert_eq!(catalog.family, SectionFamily::UB);
        assert_eq!(catalog.sections[0].web_thickness_mm, 7.7);
    }
}
