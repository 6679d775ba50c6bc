//! # Settings
//!
//! Startup configuration: where the catalogs live, how anchor names are
//! built, and the strand figures used for post-tensioning forces. Settings
//! serialize to JSON; every field has a default so a partial file is fine.
//!
//! ```json
//! {
//!   "catalogs": { "data_dir": "data", "delimiter": "," },
//!   "post_tensioning": { "anchor_prefix": "OVM.M15A" },
//!   "default_bar": "Y12"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bars::{self, DEFAULT_BAR};
use crate::derivation::{STRAND_BREAKING_LOAD_KN, WORKING_LOAD_FRACTION};
use crate::errors::{CalcError, CalcResult};

/// Root settings container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalogs: CatalogSettings,
    pub post_tensioning: PostTensioningSettings,
    /// Bar selected when nothing else has been chosen
    pub default_bar: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalogs: CatalogSettings::default(),
            post_tensioning: PostTensioningSettings::default(),
            default_bar: DEFAULT_BAR.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file.
    ///
    /// # Errors
    ///
    /// `FileError` if the file cannot be read, `SerializationError` if it
    /// is not valid settings JSON, `InvalidInput` if a value fails
    /// [`validate`](Self::validate).
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Read settings from `path` if one is given, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load).
    pub fn load_or_default(path: Option<&Path>) -> CalcResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Check values that would make lookups or derivations meaningless.
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the first offending field.
    pub fn validate(&self) -> CalcResult<()> {
        let pt = &self.post_tensioning;
        if !pt.strand_breaking_load_kn.is_finite() || pt.strand_breaking_load_kn <= 0.0 {
            return Err(CalcError::invalid_input(
                "post_tensioning.strand_breaking_load_kn",
                pt.strand_breaking_load_kn.to_string(),
                "Breaking load must be positive",
            ));
        }
        if !(pt.working_load_fraction > 0.0 && pt.working_load_fraction <= 1.0) {
            return Err(CalcError::invalid_input(
                "post_tensioning.working_load_fraction",
                pt.working_load_fraction.to_string(),
                "Working load fraction must be in (0, 1]",
            ));
        }
        if pt.anchor_prefix.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "post_tensioning.anchor_prefix",
                "",
                "Anchor prefix must not be blank",
            ));
        }
        if !self.catalogs.delimiter.is_ascii() {
            return Err(CalcError::invalid_input(
                "catalogs.delimiter",
                self.catalogs.delimiter.to_string(),
                "Delimiter must be a single ASCII character",
            ));
        }
        if matches!(self.catalogs.delimiter, '"' | '\n' | '\r') {
            return Err(CalcError::invalid_input(
                "catalogs.delimiter",
                self.catalogs.delimiter.escape_default().to_string(),
                "Delimiter must not be the quote character or a line break",
            ));
        }
        if bars::index_of(&self.default_bar).is_none() {
            return Err(CalcError::invalid_input(
                "default_bar",
                self.default_bar.clone(),
                "Not a standard bar size",
            ));
        }
        Ok(())
    }
}

/// Location and format of the catalog sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory the file names below are relative to
    pub data_dir: PathBuf,
    /// Anchor dimensions source
    pub anchors: String,
    /// Anchor spacing limits source
    pub spacing: String,
    /// Stress-bar accessories source
    pub stress_bars: String,
    /// Column delimiter
    pub delimiter: char,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            data_dir: PathBuf::from("data"),
            anchors: "anchors.csv".to_string(),
            spacing: "anchor_spacing.csv".to_string(),
            stress_bars: "stress_bars.csv".to_string(),
            delimiter: ',',
        }
    }
}

impl CatalogSettings {
    pub fn anchors_path(&self) -> PathBuf {
        self.data_dir.join(&self.anchors)
    }

    pub fn spacing_path(&self) -> PathBuf {
        self.data_dir.join(&self.spacing)
    }

    pub fn stress_bars_path(&self) -> PathBuf {
        self.data_dir.join(&self.stress_bars)
    }

    /// Delimiter as a byte, falling back to a comma for non-ASCII input
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

/// Anchor naming and strand force figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostTensioningSettings {
    /// Anchor family prefix; names are `"<prefix>-<strand count>"`
    pub anchor_prefix: String,
    /// Characteristic breaking load of one strand (kN)
    pub strand_breaking_load_kn: f64,
    /// Fraction of the breaking load quoted as the working force
    pub working_load_fraction: f64,
}

impl Default for PostTensioningSettings {
    fn default() -> Self {
        PostTensioningSettings {
            anchor_prefix: "OVM.M15A".to_string(),
            strand_breaking_load_kn: STRAND_BREAKING_LOAD_KN,
            working_load_fraction: WORKING_LOAD_FRACTION,
        }
    }
}
