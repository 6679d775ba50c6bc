//! Standard Rebar Sizes
//!
//! The fixed, ordered list of reinforcing bar designations (Y6 through Y32)
//! with their nominal diameters. The bar name is the external selector;
//! diameters feed the area and weight formulas in [`crate::derivation`].
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::bars::{diameter_of, BarSize, DEFAULT_BAR};
//!
//! assert_eq!(diameter_of("Y16"), Some(16.0));
//! assert_eq!(diameter_of("Y14"), None);
//! assert_eq!(BarSize::default().name, DEFAULT_BAR);
//! ```

use serde::Serialize;

/// Name of the bar selected when nothing else has been chosen
pub const DEFAULT_BAR: &str = "Y12";

/// A named rebar size with its nominal diameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarSize {
    /// Designation (e.g., "Y12")
    pub name: &'static str,
    /// Nominal diameter (mm)
    pub diameter_mm: f64,
}

impl BarSize {
    const fn new(name: &'static str, diameter_mm: f64) -> Self {
        Self { name, diameter_mm }
    }

    /// All standard sizes, smallest first
    pub const ALL: [BarSize; 8] = [
        BarSize::new("Y6", 6.0),
        BarSize::new("Y8", 8.0),
        BarSize::new("Y10", 10.0),
        BarSize::new("Y12", 12.0),
        BarSize::new("Y16", 16.0),
        BarSize::new("Y20", 20.0),
        BarSize::new("Y25", 25.0),
        BarSize::new("Y32", 32.0),
    ];

    /// Find a size by its exact designation
    pub fn from_name(name: &str) -> Option<BarSize> {
        BarSize::ALL.iter().copied().find(|b| b.name == name)
    }
}

impl Default for BarSize {
    fn default() -> Self {
        // Y12 is the fourth entry of ALL
        BarSize::ALL[3]
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The ordered bar table
pub fn all() -> &'static [BarSize] {
    &BarSize::ALL
}

/// Nominal diameter in mm for a bar name, if it is in the table
pub fn diameter_of(name: &str) -> Option<f64> {
    BarSize::from_name(name).map(|b| b.diameter_mm)
}

/// Ordinal position of a bar name within the table
pub fn index_of(name: &str) -> Option<usize> {
    BarSize::ALL.iter().position(|b| b.name == name)
}

/// Ordinal position of [`DEFAULT_BAR`]
pub fn default_index() -> usize {
    index_of(DEFAULT_BAR).unwrap_or(0)
}
