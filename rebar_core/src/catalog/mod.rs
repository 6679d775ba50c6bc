//! # Catalog Store
//!
//! Tabular reference data loaded once at startup and read-only afterwards.
//! Each source is a header row plus one record per row; the record type's
//! key column becomes the collection key.
//!
//! ## Loading Rules
//!
//! - A leading UTF-8 byte-order mark is stripped
//! - Header names are matched case-insensitively
//! - A missing or unreadable source yields an empty collection
//!   ([`Catalog::load`]) and a logged warning, never a hard failure
//! - Rows without a key, rows that fail to parse and repeated keys are
//!   skipped; loading continues with the next row
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::catalog::{AnchorRecord, Catalog};
//!
//! let csv = "anchor,casting_diameter\nOVM.M15A-7,160\n,999\n";
//! let anchors: Catalog<AnchorRecord> = Catalog::from_csv_str(csv, b',').unwrap();
//!
//! assert_eq!(anchors.len(), 1);
//! assert_eq!(anchors.skipped_rows(), 1);
//! assert!(anchors.get("OVM.M15A-40").is_none());
//! ```

pub mod anchor;
pub mod field;
pub mod stress_bar;

pub use anchor::{AnchorRecord, ConcreteGrade, SpacingLimits, SpacingRecord};
pub use field::{format_field, Dimension, NOT_APPLICABLE};
pub use stress_bar::StressBarRecord;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};
use crate::settings::CatalogSettings;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A row type that can be loaded into a [`Catalog`]
pub trait CatalogRecord: DeserializeOwned {
    /// Catalog name used in errors and logs
    const CATALOG: &'static str;
    /// Lower-case name of the column holding the key
    const KEY_COLUMN: &'static str;

    /// This record's key
    fn key(&self) -> &str;
}

/// A labelled, formatted attribute ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub label: String,
    /// `"<raw> <unit>"` or the not-applicable marker
    pub value: String,
}

impl FieldRow {
    pub fn new(label: &str, dimension: &Dimension, unit: &str) -> Self {
        FieldRow {
            label: label.to_string(),
            value: dimension.display(unit),
        }
    }
}

/// Keyed, source-ordered collection of catalog records
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    records: HashMap<String, R>,
    /// Keys in source order
    order: Vec<String>,
    skipped_rows: usize,
    source: Option<PathBuf>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Catalog {
            records: HashMap::new(),
            order: Vec::new(),
            skipped_rows: 0,
            source: None,
        }
    }
}

impl<R: CatalogRecord> Catalog<R> {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a file, degrading to an empty catalog.
    ///
    /// A missing or unreadable file is logged as a warning and produces an
    /// empty collection so that every lookup against it reports absence.
    pub fn load(path: &Path, delimiter: u8) -> Self {
        match Self::try_load(path, delimiter) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    catalog = R::CATALOG,
                    path = %path.display(),
                    error = %e,
                    "catalog source unavailable, continuing with an empty catalog"
                );
                Self::new()
            }
        }
    }

    /// Load a catalog from a file.
    ///
    /// # Errors
    ///
    /// `SourceUnavailable` if the file cannot be read, `SerializationError`
    /// if its header row cannot be parsed.
    pub fn try_load(path: &Path, delimiter: u8) -> CalcResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            CalcError::source_unavailable(path.display().to_string(), e.to_string())
        })?;
        let mut catalog = Self::from_csv_bytes(&bytes, delimiter)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Parse a catalog from delimited text.
    ///
    /// # Errors
    ///
    /// As for [`from_csv_bytes`](Self::from_csv_bytes).
    pub fn from_csv_str(text: &str, delimiter: u8) -> CalcResult<Self> {
        Self::from_csv_bytes(text.as_bytes(), delimiter)
    }

    /// Parse a catalog from delimited UTF-8 bytes.
    ///
    /// Each row is validated as UTF-8 on its own, so one garbled row is
    /// skipped without losing the rest of the source.
    ///
    /// # Errors
    ///
    /// `SerializationError` if the header row cannot be parsed. Bad data
    /// rows never fail the load; they are counted in
    /// [`skipped_rows`](Self::skipped_rows).
    pub fn from_csv_bytes(bytes: &[u8], delimiter: u8) -> CalcResult<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(bytes);

        let header_bytes = reader
            .byte_headers()
            .map_err(|e| CalcError::SerializationError {
                reason: format!("Failed to read {} header: {}", R::CATALOG, e),
            })?
            .clone();
        let headers: StringRecord = StringRecord::from_byte_record(header_bytes)
            .map_err(|e| CalcError::SerializationError {
                reason: format!("Failed to read {} header: {}", R::CATALOG, e),
            })?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        if !headers.iter().any(|h| h == R::KEY_COLUMN) && !headers.is_empty() {
            warn!(
                catalog = R::CATALOG,
                column = R::KEY_COLUMN,
                "key column missing from header, every row will be skipped"
            );
        }

        let mut catalog = Self::new();

        for (idx, row_result) in reader.byte_records().enumerate() {
            // +1 for the header, +1 for 1-based numbering
            let line = idx + 2;

            let row = match row_result
                .map_err(|e| e.to_string())
                .and_then(|raw| StringRecord::from_byte_record(raw).map_err(|e| e.to_string()))
            {
                Ok(row) => row,
                Err(e) => {
                    warn!(catalog = R::CATALOG, line, error = %e, "skipping unreadable row");
                    catalog.skipped_rows += 1;
                    continue;
                }
            };

            if row.iter().all(str::is_empty) {
                continue;
            }

            let inserted = row
                .deserialize::<R>(Some(&headers))
                .map_err(|e| CalcError::SerializationError {
                    reason: e.to_string(),
                })
                .and_then(|record| catalog.insert(record));

            if let Err(e) = inserted {
                warn!(catalog = R::CATALOG, line, error = %e, "skipping row");
                catalog.skipped_rows += 1;
            }
        }

        info!(
            catalog = R::CATALOG,
            records = catalog.len(),
            skipped = catalog.skipped_rows,
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Insert a record under its key.
    ///
    /// # Errors
    ///
    /// `MissingField` if the key is blank, `InvalidInput` if the key is
    /// already present (the first occurrence is kept).
    pub fn insert(&mut self, record: R) -> CalcResult<()> {
        let key = record.key().trim().to_string();
        if key.is_empty() {
            return Err(CalcError::missing_field(R::KEY_COLUMN));
        }
        if self.records.contains_key(&key) {
            return Err(CalcError::invalid_input(
                R::KEY_COLUMN,
                key,
                "Duplicate key, keeping the first occurrence",
            ));
        }
        self.order.push(key.clone());
        self.records.insert(key, record);
        Ok(())
    }

    /// Look up a record by key
    pub fn get(&self, key: &str) -> Option<&R> {
        let found = self.records.get(key.trim());
        if found.is_none() {
            debug!(catalog = R::CATALOG, key, "no record");
        }
        found
    }

    /// Look up a record by key, reporting absence as an error.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` if the key is not in the catalog.
    pub fn lookup(&self, key: &str) -> CalcResult<&R> {
        self.get(key)
            .ok_or_else(|| CalcError::record_not_found(R::CATALOG, key))
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key.trim())
    }

    /// Records in source order
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.order.iter().filter_map(|k| self.records.get(k))
    }

    /// Keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped while loading
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// File the catalog was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// The three reference catalogs, loaded independently
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    pub anchors: Catalog<AnchorRecord>,
    pub spacing: Catalog<SpacingRecord>,
    pub stress_bars: Catalog<StressBarRecord>,
}

impl CatalogSet {
    /// Load every catalog named in the settings.
    ///
    /// Each source degrades to an empty catalog on its own; one missing
    /// file never affects the others.
    pub fn load(settings: &CatalogSettings) -> Self {
        let delimiter = settings.delimiter_byte();
        let set = CatalogSet {
            anchors: Catalog::load(&settings.anchors_path(), delimiter),
            spacing: Catalog::load(&settings.spacing_path(), delimiter),
            stress_bars: Catalog::load(&settings.stress_bars_path(), delimiter),
        };
        info!(
            anchors = set.anchors.len(),
            spacing = set.spacing.len(),
            stress_bars = set.stress_bars.len(),
            "reference catalogs ready"
        );
        set
    }

    /// Summary counts, e.g. for a status line
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            anchors: self.anchors.len(),
            spacing: self.spacing.len(),
            stress_bars: self.stress_bars.len(),
            skipped_rows: self.anchors.skipped_rows()
                + self.spacing.skipped_rows()
                + self.stress_bars.skipped_rows(),
        }
    }
}

/// Record counts for a loaded [`CatalogSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub anchors: usize,
    pub spacing: usize,
    pub stress_bars: usize,
    pub skipped_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ANCHORS: &str = "\
anchor,casting_diameter,casting_length,duct_id,head_diameter,head_thickness,spiral_diameter,spiral_bar,spiral_pitch,spiral_turns
OVM.M15A-3,115,120,50,100,50,150,Y10,40,4
OVM.M15A-7,160,180,70,135,55,240,Y12,50,5
OVM.M15A-12,210,250,90,175,65,320,Y14,60,6
";

    fn anchor(row: [&str; 10]) -> AnchorRecord {
        AnchorRecord {
            anchor: row[0].to_string(),
            casting_diameter: Dimension::from(row[1]),
            casting_length: Dimension::from(row[2]),
            duct_inside_diameter: Dimension::from(row[3]),
            head_diameter: Dimension::from(row[4]),
            head_thickness: Dimension::from(row[5]),
            spiral_diameter: Dimension::from(row[6]),
            spiral_bar: Dimension::from(row[7]),
            spiral_pitch: Dimension::from(row[8]),
            spiral_turns: Dimension::from(row[9]),
        }
    }

    #[test]
    fn test_every_source_row_round_trips() {
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(ANCHORS, b',').unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.skipped_rows(), 0);

        for line in ANCHORS.lines().skip(1) {
            let cells: Vec<&str> = line.split(',').collect();
            let expected = anchor(cells.try_into().unwrap());
            assert_eq!(catalog.get(&expected.anchor), Some(&expected));
        }
    }

    #[test]
    fn test_absent_key() {
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(ANCHORS, b',').unwrap();
        assert!(catalog.get("OVM.M15A-40").is_none());
        let err = catalog.lookup("OVM.M15A-40").unwrap_err();
        assert!(err.is_absent());
    }

    #[test]
    fn test_source_order() {
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(ANCHORS, b',').unwrap();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(keys, ["OVM.M15A-3", "OVM.M15A-7", "OVM.M15A-12"]);
        assert_eq!(catalog.iter().count(), 3);
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let with_bom = format!("\u{feff}{}", ANCHORS);
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(&with_bom, b',').unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains_key("OVM.M15A-3"));
    }

    #[test]
    fn test_header_case_and_whitespace() {
        let csv = " Diameter , Ultimate_Load \n 32 , 845 \n";
        let catalog: Catalog<StressBarRecord> = Catalog::from_csv_str(csv, b',').unwrap();
        let bar = catalog.get("32").unwrap();
        assert_eq!(bar.ultimate_load_kn(), Some(845.0));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let csv = "\
anchor,casting_diameter
OVM.M15A-3,115
,999
OVM.M15A-3,120
OVM.M15A-5
OVM.M15A-7,160
";
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(csv, b',').unwrap();
        // blank key and duplicate skipped, short row kept with defaults
        assert_eq!(catalog.skipped_rows(), 2);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("OVM.M15A-3").unwrap().casting_diameter.raw(), Some("115"));
        assert!(!catalog.get("OVM.M15A-5").unwrap().casting_diameter.is_applicable());
    }

    #[test]
    fn test_missing_key_column_skips_every_row() {
        let csv = "name,casting_diameter\nOVM.M15A-3,115\nOVM.M15A-7,160\n";
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(csv, b',').unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.skipped_rows(), 2);
    }

    #[test]
    fn test_zero_and_blank_are_not_applicable() {
        let csv = "diameter,coupler_diameter,coupler_length\n26.5,0,\n";
        let catalog: Catalog<StressBarRecord> = Catalog::from_csv_str(csv, b',').unwrap();
        let bar = catalog.get("26.5").unwrap();
        assert_eq!(bar.coupler_diameter, Dimension::NotApplicable);
        assert_eq!(bar.coupler_length, Dimension::NotApplicable);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "anchor;casting_diameter\nOVM.M15A-4;130\n";
        let catalog: Catalog<AnchorRecord> = Catalog::from_csv_str(csv, b';').unwrap();
        assert_eq!(catalog.get("OVM.M15A-4").unwrap().casting_diameter.raw(), Some("130"));
    }

    #[test]
    fn test_empty_text() {
        let catalog: Catalog<SpacingRecord> = Catalog::from_csv_str("", b',').unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.csv");

        let err = Catalog::<AnchorRecord>::try_load(&path, b',').unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");

        let catalog = Catalog::<AnchorRecord>::load(&path, b',');
        assert!(catalog.is_empty());
        assert!(catalog.get("OVM.M15A-7").is_none());
        assert!(catalog.source().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFanchor,casting_diameter\nOVM.M15A-7,160\n").unwrap();

        let catalog = Catalog::<AnchorRecord>::load(file.path(), b',');
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.source(), Some(file.path()));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"anchor,casting_diameter\nOVM.M15A-3,115\nOVM.M15A-5,1\xFF0\nOVM.M15A-7,160\n")
            .unwrap();

        let catalog = Catalog::<AnchorRecord>::load(file.path(), b',');
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped_rows(), 1);
        assert!(catalog.contains_key("OVM.M15A-3"));
        assert!(catalog.contains_key("OVM.M15A-7"));
        assert!(catalog.get("OVM.M15A-5").is_none());
    }

    #[test]
    fn test_invalid_utf8_header_is_an_error() {
        let err = Catalog::<AnchorRecord>::from_csv_bytes(b"anch\xFFor\nOVM.M15A-7\n", b',')
            .unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_catalog_set_sources_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stress_bars.csv"),
            "diameter,ultimate_load\n32,845\n",
        )
        .unwrap();

        let settings = CatalogSettings {
            data_dir: dir.path().to_path_buf(),
            ..CatalogSettings::default()
        };
        let set = CatalogSet::load(&settings);

        assert!(set.anchors.is_empty());
        assert!(set.spacing.is_empty());
        assert_eq!(set.stress_bars.len(), 1);
        assert_eq!(
            set.summary(),
            CatalogSummary { anchors: 0, spacing: 0, stress_bars: 1, skipped_rows: 0 }
        );
    }
}
