//! # Derivations
//!
//! Pure functions for bar geometry and force figures. All arithmetic is
//! `f64` and nothing is rounded here; display precision belongs to the
//! caller.
//!
//! ## Formulas
//!
//! | Quantity           | Formula                  | Units  |
//! |--------------------|--------------------------|--------|
//! | Area               | π·d²/4                   | mm²    |
//! | Unit weight        | A × 7850×10⁻⁶            | kg/m   |
//! | Area for n bars    | A × n                    | mm²    |
//! | Area per metre     | A × 1000 / s             | mm²/m  |
//! | Force at fraction  | P × f                    | kN     |
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::derivation::{aggregate_area, bar_area};
//!
//! let a = bar_area(12.0);
//! assert!((a - 113.097).abs() < 1e-3);
//! assert!(aggregate_area(12.0, 0).is_err());
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Steel density collapsed into the area → weight factor (kg per mm² per m).
///
/// 7850 kg/m³ × 10⁻⁶ m²/mm².
pub const STEEL_DENSITY_KG_PER_MM2_M: f64 = 7850e-6;

/// Characteristic breaking load of one 15.7 mm strand (kN)
pub const STRAND_BREAKING_LOAD_KN: f64 = 279.0;

/// Fraction of the breaking load quoted as the working force
pub const WORKING_LOAD_FRACTION: f64 = 0.75;

/// Area and unit weight derived from a nominal diameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedBarMetrics {
    /// Cross-sectional area (mm²)
    pub area_mm2: f64,
    /// Unit weight (kg/m)
    pub weight_kg_per_m: f64,
}

impl DerivedBarMetrics {
    /// Derive metrics for a bar of diameter `diameter_mm`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the diameter is not a positive finite number.
    pub fn from_diameter(diameter_mm: f64) -> CalcResult<Self> {
        validate_diameter(diameter_mm)?;
        Ok(Self {
            area_mm2: bar_area(diameter_mm),
            weight_kg_per_m: bar_weight(diameter_mm),
        })
    }
}

/// Cross-sectional area of a circular bar (mm²)
pub fn bar_area(diameter_mm: f64) -> f64 {
    PI * diameter_mm * diameter_mm / 4.0
}

/// Unit weight of a steel bar (kg/m)
pub fn bar_weight(diameter_mm: f64) -> f64 {
    bar_area(diameter_mm) * STEEL_DENSITY_KG_PER_MM2_M
}

/// Total area of `count` bars (mm²).
///
/// # Errors
///
/// `InvalidInput` when `count` is zero or negative. There is no valid zero
/// result.
pub fn aggregate_area(diameter_mm: f64, count: i64) -> CalcResult<f64> {
    validate_diameter(diameter_mm)?;
    if count <= 0 {
        return Err(CalcError::invalid_input(
            "count",
            count.to_string(),
            "Number of bars must be a positive integer",
        ));
    }
    Ok(bar_area(diameter_mm) * count as f64)
}

/// Area per metre run for bars at centre-to-centre spacing `spacing_mm` (mm²/m).
///
/// # Errors
///
/// `InvalidInput` when the spacing is not a positive finite number.
pub fn area_per_length(diameter_mm: f64, spacing_mm: f64) -> CalcResult<f64> {
    validate_diameter(diameter_mm)?;
    if !spacing_mm.is_finite() || spacing_mm <= 0.0 {
        return Err(CalcError::invalid_input(
            "spacing_mm",
            spacing_mm.to_string(),
            "Spacing must be a positive number of millimetres",
        ));
    }
    Ok(bar_area(diameter_mm) * (1000.0 / spacing_mm))
}

/// `base_force_kn × fraction`, e.g. the 75% working load
pub fn force_at_fraction(base_force_kn: f64, fraction: f64) -> f64 {
    base_force_kn * fraction
}

/// Breaking load of a tendon of `strand_count` strands (kN)
pub fn tendon_breaking_load(strand_count: u32, per_strand_kn: f64) -> f64 {
    strand_count as f64 * per_strand_kn
}

/// Parse a bar count typed by the user.
///
/// # Errors
///
/// `InvalidInput` for blank, non-integral or non-positive text.
pub fn parse_count(text: &str) -> CalcResult<i64> {
    let trimmed = text.trim();
    let count: i64 = trimmed.parse().map_err(|_| {
        CalcError::invalid_input("count", trimmed, "Number of bars must be a whole number")
    })?;
    if count <= 0 {
        return Err(CalcError::invalid_input(
            "count",
            trimmed,
            "Number of bars must be a positive integer",
        ));
    }
    Ok(count)
}

/// Parse a centre-to-centre spacing in mm typed by the user.
///
/// # Errors
///
/// `InvalidInput` for blank, non-numeric, non-finite or non-positive text.
pub fn parse_spacing(text: &str) -> CalcResult<f64> {
    let trimmed = text.trim();
    let spacing: f64 = trimmed.parse().map_err(|_| {
        CalcError::invalid_input("spacing_mm", trimmed, "Spacing must be a number")
    })?;
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(CalcError::invalid_input(
            "spacing_mm",
            trimmed,
            "Spacing must be a positive number of millimetres",
        ));
    }
    Ok(spacing)
}

/// Parse a strand count typed by the user.
///
/// # Errors
///
/// `InvalidInput` for blank, non-integral or non-positive text.
pub fn parse_strand_count(text: &str) -> CalcResult<u32> {
    let trimmed = text.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CalcError::invalid_input(
            "strand_count",
            trimmed,
            "Strand count must be a positive integer",
        )),
    }
}

fn validate_diameter(diameter_mm: f64) -> CalcResult<()> {
    if !diameter_mm.is_finite() || diameter_mm <= 0.0 {
        return Err(CalcError::invalid_input(
            "diameter_mm",
            diameter_mm.to_string(),
            "Diameter must be positive",
        ));
    }
    Ok(())
}
