//! Prestressing stress-bar accessories, keyed by nominal bar diameter.
//!
//! ## Source Columns
//!
//! ```text
//! diameter,unit_weight,ultimate_load,nut_thickness,nut_across_flats,coupler_diameter,coupler_length,
//! plate_length,plate_width,plate_thickness,spiral_diameter,spiral_pitch,spiral_turns,spiral_bar
//! ```

use serde::{Deserialize, Serialize};

use super::field::Dimension;
use super::{CatalogRecord, FieldRow};

/// One stress-bar size with its nut, coupler, end plate and spiral data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StressBarRecord {
    /// Nominal diameter as written in the source (mm), e.g. "32"
    pub diameter: String,
    /// Unit weight (kg/m)
    pub unit_weight: Dimension,
    /// Ultimate breaking load (kN)
    pub ultimate_load: Dimension,
    /// Nut thickness (mm)
    pub nut_thickness: Dimension,
    /// Nut across flats (mm)
    pub nut_across_flats: Dimension,
    /// Coupler outside diameter (mm)
    pub coupler_diameter: Dimension,
    /// Coupler length (mm)
    pub coupler_length: Dimension,
    /// End plate length (mm)
    pub plate_length: Dimension,
    /// End plate width (mm)
    pub plate_width: Dimension,
    /// End plate thickness (mm)
    pub plate_thickness: Dimension,
    /// Spiral outside diameter (mm)
    pub spiral_diameter: Dimension,
    /// Spiral pitch (mm)
    pub spiral_pitch: Dimension,
    /// Number of spiral turns
    pub spiral_turns: Dimension,
    /// Spiral bar designation
    pub spiral_bar: Dimension,
}

impl CatalogRecord for StressBarRecord {
    const CATALOG: &'static str = "stress bar";
    const KEY_COLUMN: &'static str = "diameter";

    fn key(&self) -> &str {
        &self.diameter
    }
}

impl StressBarRecord {
    /// Tabulated ultimate load in kN, if given
    pub fn ultimate_load_kn(&self) -> Option<f64> {
        self.ultimate_load.as_f64().filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Labelled, formatted attributes in display order
    pub fn fields(&self) -> Vec<FieldRow> {
        vec![
            FieldRow::new("Unit weight", &self.unit_weight, "kg/m"),
            FieldRow::new("Ultimate load", &self.ultimate_load, "kN"),
            FieldRow::new("Nut thickness", &self.nut_thickness, "mm"),
            FieldRow::new("Nut across flats", &self.nut_across_flats, "mm"),
            FieldRow::new("Coupler diameter", &self.coupler_diameter, "mm"),
            FieldRow::new("Coupler length", &self.coupler_length, "mm"),
            FieldRow::new("End plate length", &self.plate_length, "mm"),
            FieldRow::new("End plate width", &self.plate_width, "mm"),
            FieldRow::new("End plate thickness", &self.plate_thickness, "mm"),
            FieldRow::new("Spiral diameter", &self.spiral_diameter, "mm"),
            FieldRow::new("Spiral pitch", &self.spiral_pitch, "mm"),
            FieldRow::new("Spiral turns", &self.spiral_turns, ""),
            FieldRow::new("Spiral bar", &self.spiral_bar, ""),
        ]
    }
}
