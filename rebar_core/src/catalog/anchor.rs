//! Post-tensioning anchor catalogs.
//!
//! Two sources are keyed by anchor name (`"<prefix>-<strand count>"`, e.g.
//! `OVM.M15A-7`):
//!
//! - **anchors**: casting, duct, bearing head and spiral dimensions
//! - **anchor spacing**: minimum centre-to-centre spacing and edge distance
//!   for each concrete strength class
//!
//! ## Source Columns
//!
//! ```text
//! anchor,casting_diameter,casting_length,duct_id,head_diameter,head_thickness,spiral_diameter,spiral_bar,spiral_pitch,spiral_turns
//! anchor,spacing_c40,edge_c40,spacing_c50,edge_c50,spacing_c60,edge_c60
//! ```

use serde::{Deserialize, Serialize};

use super::field::Dimension;
use super::{CatalogRecord, FieldRow};

/// One anchor type's hardware dimensions (mm unless noted)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorRecord {
    /// Anchor name, e.g. "OVM.M15A-7"
    pub anchor: String,
    /// Casting (guide) outside diameter
    pub casting_diameter: Dimension,
    /// Casting length
    pub casting_length: Dimension,
    /// Duct inside diameter
    #[serde(rename = "duct_id")]
    pub duct_inside_diameter: Dimension,
    /// Anchor head diameter
    pub head_diameter: Dimension,
    /// Anchor head thickness
    pub head_thickness: Dimension,
    /// Spiral outside diameter
    pub spiral_diameter: Dimension,
    /// Spiral bar designation (e.g., "Y12")
    pub spiral_bar: Dimension,
    /// Spiral pitch
    pub spiral_pitch: Dimension,
    /// Number of spiral turns
    pub spiral_turns: Dimension,
}

impl CatalogRecord for AnchorRecord {
    const CATALOG: &'static str = "anchor";
    const KEY_COLUMN: &'static str = "anchor";

    fn key(&self) -> &str {
        &self.anchor
    }
}

impl AnchorRecord {
    /// Labelled, formatted attributes in display order
    pub fn fields(&self) -> Vec<FieldRow> {
        vec![
            FieldRow::new("Casting diameter", &self.casting_diameter, "mm"),
            FieldRow::new("Casting length", &self.casting_length, "mm"),
            FieldRow::new("Duct inside diameter", &self.duct_inside_diameter, "mm"),
            FieldRow::new("Head diameter", &self.head_diameter, "mm"),
            FieldRow::new("Head thickness", &self.head_thickness, "mm"),
            FieldRow::new("Spiral diameter", &self.spiral_diameter, "mm"),
            FieldRow::new("Spiral bar", &self.spiral_bar, ""),
            FieldRow::new("Spiral pitch", &self.spiral_pitch, "mm"),
            FieldRow::new("Spiral turns", &self.spiral_turns, ""),
        ]
    }
}

/// Concrete strength class at transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    C40,
    C50,
    C60,
}

impl ConcreteGrade {
    /// All grades, weakest first
    pub const ALL: [ConcreteGrade; 3] = [ConcreteGrade::C40, ConcreteGrade::C50, ConcreteGrade::C60];

    /// Cube strength (MPa)
    pub fn strength_mpa(&self) -> u32 {
        match self {
            ConcreteGrade::C40 => 40,
            ConcreteGrade::C50 => 50,
            ConcreteGrade::C60 => 60,
        }
    }

    /// Get display name (e.g., "40 MPa")
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteGrade::C40 => "40 MPa",
            ConcreteGrade::C50 => "50 MPa",
            ConcreteGrade::C60 => "60 MPa",
        }
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Spacing limits for one anchor and one concrete grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingLimits {
    pub grade: ConcreteGrade,
    /// Minimum centre-to-centre spacing (mm)
    pub centre_spacing: Dimension,
    /// Minimum edge distance (mm)
    pub edge_distance: Dimension,
}

/// Minimum anchor spacing and edge distance by concrete grade (mm)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingRecord {
    /// Anchor name, e.g. "OVM.M15A-7"
    pub anchor: String,
    pub spacing_c40: Dimension,
    pub edge_c40: Dimension,
    pub spacing_c50: Dimension,
    pub edge_c50: Dimension,
    pub spacing_c60: Dimension,
    pub edge_c60: Dimension,
}

impl CatalogRecord for SpacingRecord {
    const CATALOG: &'static str = "anchor spacing";
    const KEY_COLUMN: &'static str = "anchor";

    fn key(&self) -> &str {
        &self.anchor
    }
}

impl SpacingRecord {
    /// Limits for a single concrete grade
    pub fn limits(&self, grade: ConcreteGrade) -> SpacingLimits {
        let (centre_spacing, edge_distance) = match grade {
            ConcreteGrade::C40 => (&self.spacing_c40, &self.edge_c40),
            ConcreteGrade::C50 => (&self.spacing_c50, &self.edge_c50),
            ConcreteGrade::C60 => (&self.spacing_c60, &self.edge_c60),
        };
        SpacingLimits {
            grade,
            centre_spacing: centre_spacing.clone(),
            edge_distance: edge_distance.clone(),
        }
    }

    /// Limits for every grade, weakest first
    pub fn all_limits(&self) -> Vec<SpacingLimits> {
        ConcreteGrade::ALL.iter().map(|g| self.limits(*g)).collect()
    }
}
