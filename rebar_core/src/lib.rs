//! # rebar_core - Reinforcement Reference Engine
//!
//! `rebar_core` answers the everyday lookups of reinforced and
//! post-tensioned concrete detailing: rebar area and weight, total steel
//! for a bar count or spacing, post-tensioning anchor dimensions and
//! spacing limits, and stress-bar accessory data with ultimate/working
//! forces.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: catalogs load once into an immutable [`Lookup`]; every
//!   query is a pure function of its arguments
//! - **No fatal paths**: missing sources give empty catalogs, unknown keys
//!   give `None`, bad input gives `InvalidInput`
//! - **JSON-First**: results and errors implement Serialize
//!
//! ## Quick Start
//!
//! ```rust
//! use rebar_core::{Lookup, Settings};
//!
//! // Catalogs missing from ./data simply load empty
//! let lookup = Lookup::from_settings(&Settings::default());
//!
//! let spacing = lookup.area_for_spacing("Y12", "150").unwrap();
//! assert_eq!(spacing.to_string(), "Y12 @ 150 mm c/c  =  754.0 mm²/m");
//! ```
//!
//! ## Modules
//!
//! - [`bars`] - The standard rebar sizes
//! - [`derivation`] - Area, weight and force formulas
//! - [`catalog`] - Anchor, spacing and stress-bar catalogs
//! - [`query`] - Lookup facade for presentation layers
//! - [`settings`] - Startup configuration
//! - [`errors`] - Structured error types

pub mod bars;
pub mod catalog;
pub mod derivation;
pub mod errors;
pub mod query;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use bars::{BarSize, DEFAULT_BAR};
pub use catalog::{format_field, CatalogSet, Dimension, NOT_APPLICABLE};
pub use derivation::DerivedBarMetrics;
pub use errors::{CalcError, CalcResult};
pub use query::{ForceSummary, Lookup};
pub use settings::Settings;
