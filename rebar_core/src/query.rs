//! # Lookups
//!
//! Request/response entry points for a presentation layer. [`Lookup`] owns
//! the loaded catalogs and post-tensioning settings; every method is a pure
//! function of its arguments and that immutable state.
//!
//! Absence is reported as `None` (or `RecordNotFound` where a method
//! already returns a `Result`), and bad user input as `InvalidInput`, so a
//! caller can always tell "no data" from "zero".
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::catalog::CatalogSet;
//! use rebar_core::query::Lookup;
//! use rebar_core::settings::PostTensioningSettings;
//!
//! let lookup = Lookup::new(CatalogSet::default(), PostTensioningSettings::default());
//!
//! let y12 = lookup.rebar_metrics("Y12").unwrap();
//! assert!((y12.area_mm2 - 113.1).abs() < 0.05);
//!
//! let forces = lookup.strand_forces(7).unwrap();
//! assert_eq!(forces.ultimate_label(), "P_ult 1953 kN");
//! assert_eq!(forces.working_label(), "P_75% 1465 kN");
//!
//! // Empty catalogs degrade to absence
//! assert!(lookup.anchor_for_strand_count(7).is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::bars::{self, BarSize};
use crate::catalog::{AnchorRecord, CatalogSet, SpacingLimits, SpacingRecord, StressBarRecord};
use crate::derivation::{
    aggregate_area, area_per_length, force_at_fraction, parse_count, parse_spacing,
    tendon_breaking_load, DerivedBarMetrics,
};
use crate::errors::{CalcError, CalcResult};
use crate::settings::{PostTensioningSettings, Settings};

/// Metrics for a bar name, or `None` if the name is not in the bar table
pub fn rebar_metrics(name: &str) -> Option<DerivedBarMetrics> {
    let diameter = bars::diameter_of(name)?;
    DerivedBarMetrics::from_diameter(diameter).ok()
}

/// A bar table row with its derived metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RebarRow {
    pub bar: BarSize,
    pub metrics: DerivedBarMetrics,
}

/// Total steel area for a number of bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountResult {
    pub bar: String,
    pub count: i64,
    /// Total area (mm²)
    pub area_mm2: f64,
}

impl std::fmt::Display for CountResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} × {}  =  {:.1} mm²", self.count, self.bar, self.area_mm2)
    }
}

/// Steel area per metre run for bars at a spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingResult {
    pub bar: String,
    /// Centre-to-centre spacing (mm)
    pub spacing_mm: f64,
    /// Area per metre (mm²/m)
    pub area_mm2_per_m: f64,
}

impl std::fmt::Display for SpacingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {:.0} mm c/c  =  {:.1} mm²/m",
            self.bar, self.spacing_mm, self.area_mm2_per_m
        )
    }
}

/// Ultimate and working force for a tendon or stress bar (kN)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSummary {
    pub ultimate_kn: f64,
    pub working_kn: f64,
    pub working_fraction: f64,
}

impl ForceSummary {
    pub fn from_ultimate(ultimate_kn: f64, working_fraction: f64) -> Self {
        ForceSummary {
            ultimate_kn,
            working_kn: force_at_fraction(ultimate_kn, working_fraction),
            working_fraction,
        }
    }

    /// e.g. `"P_ult 1953 kN"`
    pub fn ultimate_label(&self) -> String {
        format!("P_ult {:.0} kN", self.ultimate_kn)
    }

    /// e.g. `"P_75% 1465 kN"`
    pub fn working_label(&self) -> String {
        format!(
            "P_{:.0}% {:.0} kN",
            self.working_fraction * 100.0,
            self.working_kn
        )
    }
}

/// Query facade over the bar table and the loaded catalogs
#[derive(Debug, Clone)]
pub struct Lookup {
    catalogs: CatalogSet,
    post_tensioning: PostTensioningSettings,
}

impl Lookup {
    pub fn new(catalogs: CatalogSet, post_tensioning: PostTensioningSettings) -> Self {
        Lookup {
            catalogs,
            post_tensioning,
        }
    }

    /// Load the catalogs named in `settings` and build a lookup over them
    pub fn from_settings(settings: &Settings) -> Self {
        Lookup::new(
            CatalogSet::load(&settings.catalogs),
            settings.post_tensioning.clone(),
        )
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    pub fn post_tensioning(&self) -> &PostTensioningSettings {
        &self.post_tensioning
    }

    // ------------------------------------------------------------------
    // Rebar
    // ------------------------------------------------------------------

    /// See [`rebar_metrics`]
    pub fn rebar_metrics(&self, name: &str) -> Option<DerivedBarMetrics> {
        rebar_metrics(name)
    }

    /// Every bar size with its metrics, in table order
    pub fn rebar_table(&self) -> Vec<RebarRow> {
        bars::all()
            .iter()
            .filter_map(|bar| {
                DerivedBarMetrics::from_diameter(bar.diameter_mm)
                    .ok()
                    .map(|metrics| RebarRow { bar: *bar, metrics })
            })
            .collect()
    }

    /// Total area of `count_text` bars of size `bar`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the count is not a positive integer,
    /// `RecordNotFound` if the bar is not in the table.
    pub fn area_for_count(&self, bar: &str, count_text: &str) -> CalcResult<CountResult> {
        let count = parse_count(count_text)?;
        let size = resolve_bar(bar)?;
        Ok(CountResult {
            bar: size.name.to_string(),
            count,
            area_mm2: aggregate_area(size.diameter_mm, count)?,
        })
    }

    /// Area per metre of bars of size `bar` at `spacing_text` mm c/c.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the spacing is not a positive number,
    /// `RecordNotFound` if the bar is not in the table.
    pub fn area_for_spacing(&self, bar: &str, spacing_text: &str) -> CalcResult<SpacingResult> {
        let spacing_mm = parse_spacing(spacing_text)?;
        let size = resolve_bar(bar)?;
        Ok(SpacingResult {
            bar: size.name.to_string(),
            spacing_mm,
            area_mm2_per_m: area_per_length(size.diameter_mm, spacing_mm)?,
        })
    }

    // ------------------------------------------------------------------
    // Post-tensioning anchors
    // ------------------------------------------------------------------

    /// Catalog key for an anchor carrying `strand_count` strands
    pub fn anchor_name(&self, strand_count: u32) -> String {
        format!("{}-{}", self.post_tensioning.anchor_prefix, strand_count)
    }

    pub fn anchor_for_strand_count(&self, strand_count: u32) -> Option<&AnchorRecord> {
        self.catalogs.anchors.get(&self.anchor_name(strand_count))
    }

    pub fn spacing_for_strand_count(&self, strand_count: u32) -> Option<&SpacingRecord> {
        self.catalogs.spacing.get(&self.anchor_name(strand_count))
    }

    /// Spacing limits per concrete grade; empty when the anchor is absent
    pub fn spacing_rows(&self, strand_count: u32) -> Vec<SpacingLimits> {
        self.spacing_for_strand_count(strand_count)
            .map(SpacingRecord::all_limits)
            .unwrap_or_default()
    }

    /// Strand counts present in the anchor catalog, ascending.
    ///
    /// Only keys that [`anchor_name`](Self::anchor_name) reproduces exactly
    /// are counted, so every listed count resolves with
    /// [`anchor_for_strand_count`](Self::anchor_for_strand_count).
    pub fn strand_counts(&self) -> Vec<u32> {
        let prefix = format!("{}-", self.post_tensioning.anchor_prefix);
        let mut counts: Vec<u32> = self
            .catalogs
            .anchors
            .keys()
            .filter_map(|key| {
                let n: u32 = key.strip_prefix(&prefix)?.parse().ok()?;
                (n > 0 && self.anchor_name(n) == key).then_some(n)
            })
            .collect();
        counts.sort_unstable();
        counts.dedup();
        counts
    }

    /// Breaking and working force for a tendon of `strand_count` strands.
    ///
    /// Any positive count is accepted whether or not the catalog lists it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a strand count of zero.
    pub fn strand_forces(&self, strand_count: u32) -> CalcResult<ForceSummary> {
        if strand_count == 0 {
            return Err(CalcError::invalid_input(
                "strand_count",
                "0",
                "Strand count must be a positive integer",
            ));
        }
        let ultimate = tendon_breaking_load(strand_count, self.post_tensioning.strand_breaking_load_kn);
        Ok(ForceSummary::from_ultimate(
            ultimate,
            self.post_tensioning.working_load_fraction,
        ))
    }

    // ------------------------------------------------------------------
    // Stress bars
    // ------------------------------------------------------------------

    pub fn stress_bar(&self, diameter_key: &str) -> Option<&StressBarRecord> {
        self.catalogs.stress_bars.get(diameter_key)
    }

    /// Forces from the tabulated ultimate load; `None` if the bar is absent
    /// or its load is not given
    pub fn stress_bar_forces(&self, diameter_key: &str) -> Option<ForceSummary> {
        let ultimate = self.stress_bar(diameter_key)?.ultimate_load_kn()?;
        Some(ForceSummary::from_ultimate(
            ultimate,
            self.post_tensioning.working_load_fraction,
        ))
    }
}

fn resolve_bar(name: &str) -> CalcResult<BarSize> {
    BarSize::from_name(name).ok_or_else(|| CalcError::record_not_found("bar", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ConcreteGrade};

    const ANCHORS: &str = "\
anchor,casting_diameter,casting_length,duct_id,head_diameter,head_thickness,spiral_diameter,spiral_bar,spiral_pitch,spiral_turns
OVM.M15A-3,115,120,50,100,50,150,Y10,40,4
OVM.M15A-7,160,180,70,135,55,240,Y12,50,5
OVM.M15A-12,210,250,90,175,65,320,Y14,60,6
VSL-E5-7,165,190,72,140,55,250,Y12,50,5
";

    const SPACING: &str = "\
anchor,spacing_c40,edge_c40,spacing_c50,edge_c50,spacing_c60,edge_c60
OVM.M15A-7,250,145,225,135,0,
";

    const STRESS_BARS: &str = "\
diameter,unit_weight,ultimate_load,nut_thickness
32,6.53,845,50
40,10.21,,65
";

    fn lookup() -> Lookup {
        let catalogs = CatalogSet {
            anchors: Catalog::from_csv_str(ANCHORS, b',').unwrap(),
            spacing: Catalog::from_csv_str(SPACING, b',').unwrap(),
            stress_bars: Catalog::from_csv_str(STRESS_BARS, b',').unwrap(),
        };
        Lookup::new(catalogs, PostTensioningSettings::default())
    }

    #[test]
    fn test_rebar_metrics() {
        let m = lookup().rebar_metrics("Y12").unwrap();
        assert!((m.area_mm2 - 113.097).abs() < 1e-3);
        assert!((m.weight_kg_per_m - 0.888).abs() < 5e-4);
        assert!(lookup().rebar_metrics("Y14").is_none());
    }

    #[test]
    fn test_rebar_table() {
        let table = lookup().rebar_table();
        assert_eq!(table.len(), 8);
        assert_eq!(table[bars::default_index()].bar.name, "Y12");
        assert!(table.windows(2).all(|w| w[0].metrics.area_mm2 < w[1].metrics.area_mm2));
    }

    #[test]
    fn test_area_for_count() {
        let result = lookup().area_for_count("Y12", "5").unwrap();
        assert_eq!(result.count, 5);
        assert!((result.area_mm2 - 565.5).abs() < 0.05);
        assert_eq!(result.to_string(), "5 × Y12  =  565.5 mm²");
    }

    #[test]
    fn test_area_for_count_invalid_vs_absent() {
        let l = lookup();
        assert_eq!(l.area_for_count("Y12", "0").unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(l.area_for_count("Y12", "").unwrap_err().error_code(), "INVALID_INPUT");
        assert!(l.area_for_count("Y99", "5").unwrap_err().is_absent());
    }

    #[test]
    fn test_area_for_spacing() {
        let result = lookup().area_for_spacing("Y12", "150").unwrap();
        assert!((result.area_mm2_per_m - 754.0).abs() < 0.05);
        assert_eq!(result.to_string(), "Y12 @ 150 mm c/c  =  754.0 mm²/m");
        assert!(lookup().area_for_spacing("Y12", "-150").is_err());
    }

    #[test]
    fn test_anchor_lookup() {
        let l = lookup();
        assert_eq!(l.anchor_name(7), "OVM.M15A-7");
        let anchor = l.anchor_for_strand_count(7).unwrap();
        assert_eq!(anchor.casting_diameter.display("mm"), "160 mm");
        assert!(l.anchor_for_strand_count(40).is_none());
    }

    #[test]
    fn test_absent_anchor_has_no_spacing_rows() {
        let l = lookup();
        assert!(l.spacing_for_strand_count(40).is_none());
        assert!(l.spacing_rows(40).is_empty());
        // anchor present but no spacing row
        assert!(l.spacing_rows(3).is_empty());
    }

    #[test]
    fn test_spacing_rows() {
        let rows = lookup().spacing_rows(7);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].grade, ConcreteGrade::C40);
        assert_eq!(rows[0].centre_spacing.display("mm"), "250 mm");
        assert_eq!(rows[2].centre_spacing.display("mm"), "—");
        assert_eq!(rows[2].edge_distance.display("mm"), "—");
    }

    #[test]
    fn test_strand_counts_come_from_catalog() {
        assert_eq!(lookup().strand_counts(), vec![3, 7, 12]);
        assert!(Lookup::new(CatalogSet::default(), PostTensioningSettings::default())
            .strand_counts()
            .is_empty());
    }

    #[test]
    fn test_strand_counts_skip_non_canonical_keys() {
        let csv = "anchor,casting_diameter\nOVM.M15A-07,160\nOVM.M15A-+9,185\nOVM.M15A-12,210\n";
        let catalogs = CatalogSet {
            anchors: Catalog::from_csv_str(csv, b',').unwrap(),
            ..CatalogSet::default()
        };
        let l = Lookup::new(catalogs, PostTensioningSettings::default());

        assert_eq!(l.strand_counts(), vec![12]);
        assert!(l.anchor_for_strand_count(7).is_none());
        for n in l.strand_counts() {
            assert!(l.anchor_for_strand_count(n).is_some());
        }
    }

    #[test]
    fn test_anchor_prefix_is_configurable() {
        let mut l = lookup();
        l.post_tensioning.anchor_prefix = "VSL-E5".to_string();
        assert_eq!(l.strand_counts(), vec![7]);
        assert_eq!(l.anchor_for_strand_count(7).unwrap().anchor, "VSL-E5-7");
    }

    #[test]
    fn test_strand_forces() {
        let forces = lookup().strand_forces(7).unwrap();
        assert!((forces.ultimate_kn - 1953.0).abs() < 1e-9);
        assert!((forces.working_kn - 1464.75).abs() < 1e-9);
        assert_eq!(forces.ultimate_label(), "P_ult 1953 kN");
        assert_eq!(forces.working_label(), "P_75% 1465 kN");

        // not in the catalog, still a valid tendon
        assert!(lookup().strand_forces(40).is_ok());
        assert!(lookup().strand_forces(0).is_err());
    }

    #[test]
    fn test_stress_bar_forces() {
        let l = lookup();
        let forces = l.stress_bar_forces("32").unwrap();
        assert_eq!(forces.ultimate_label(), "P_ult 845 kN");
        assert!((forces.working_kn - 633.75).abs() < 1e-9);

        assert!(l.stress_bar("40").is_some());
        assert!(l.stress_bar_forces("40").is_none());
        assert!(l.stress_bar("99").is_none());
        assert!(l.stress_bar_forces("99").is_none());
    }

    #[test]
    fn test_empty_catalogs_degrade_to_absence() {
        let l = Lookup::new(CatalogSet::default(), PostTensioningSettings::default());
        assert!(l.anchor_for_strand_count(7).is_none());
        assert!(l.spacing_rows(7).is_empty());
        assert!(l.stress_bar("32").is_none());
        // bar table is independent of the catalogs
        assert!(l.rebar_metrics("Y16").is_some());
    }

    #[test]
    fn test_shipped_catalogs() {
        use crate::settings::CatalogSettings;

        let settings = Settings {
            catalogs: CatalogSettings {
                data_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../data").into(),
                ..CatalogSettings::default()
            },
            ..Settings::default()
        };
        let l = Lookup::from_settings(&settings);
        assert_eq!(l.catalogs().summary().skipped_rows, 0);

        let counts = l.strand_counts();
        assert_eq!(counts.first(), Some(&1));
        assert_eq!(counts.last(), Some(&37));
        for n in counts {
            assert!(l.spacing_for_strand_count(n).is_some(), "no spacing row for {n} strands");
        }
        assert!(l.anchor_for_strand_count(40).is_none());

        let single = l.anchor_for_strand_count(1).unwrap();
        assert!(!single.spiral_bar.is_applicable());
        assert!(l.spacing_rows(1).iter().all(|r| !r.centre_spacing.is_applicable()));

        assert_eq!(l.stress_bar_forces("32").unwrap().ultimate_label(), "P_ult 845 kN");
    }

    #[test]
    fn test_results_serialize() {
        let result = lookup().area_for_count("Y16", "4").unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: CountResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
