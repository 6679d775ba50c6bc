//! Catalog cell values.
//!
//! Catalog sources mark an attribute that does not apply to a row with a
//! blank cell or a literal `0`. That decision is made once, at load time,
//! by [`Dimension::parse`]. A genuine zero-valued dimension cannot be told
//! apart from "not applicable" in the source data, so both render as
//! [`NOT_APPLICABLE`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker rendered for attributes that do not apply
pub const NOT_APPLICABLE: &str = "—";

/// A catalog attribute: either not applicable or the raw source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    /// Blank or literal zero in the source
    #[default]
    NotApplicable,
    /// Raw cell text, kept verbatim for redisplay
    Value(String),
}

impl Dimension {
    /// Classify a raw cell
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_sentinel(trimmed) {
            Dimension::NotApplicable
        } else {
            Dimension::Value(trimmed.to_string())
        }
    }

    /// Check if the attribute applies to this row
    pub fn is_applicable(&self) -> bool {
        matches!(self, Dimension::Value(_))
    }

    /// Raw source text, if applicable
    pub fn raw(&self) -> Option<&str> {
        match self {
            Dimension::Value(raw) => Some(raw),
            Dimension::NotApplicable => None,
        }
    }

    /// Numeric value, if applicable and parseable
    pub fn as_f64(&self) -> Option<f64> {
        self.raw().and_then(|raw| raw.parse::<f64>().ok())
    }

    /// Render with a unit, e.g. `"150 mm"`, or [`NOT_APPLICABLE`]
    pub fn display(&self, unit: &str) -> String {
        format_field(self.raw().unwrap_or(""), unit)
    }
}

impl From<&str> for Dimension {
    fn from(raw: &str) -> Self {
        Dimension::parse(raw)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Value(raw) => write!(f, "{}", raw),
            Dimension::NotApplicable => write!(f, "{}", NOT_APPLICABLE),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Value(raw) => serializer.serialize_some(raw),
            Dimension::NotApplicable => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.map(|r| Dimension::parse(&r)).unwrap_or_default())
    }
}

/// `"<raw> <unit>"`, or [`NOT_APPLICABLE`] for a blank or literal-zero cell.
///
/// Surrounding whitespace in `raw` is trimmed before the sentinel check and
/// in the output. An empty unit yields just the raw text, with no trailing
/// space (used for designations and counts such as `"Y12"` or `"5"`).
pub fn format_field(raw: &str, unit: &str) -> String {
    let trimmed = raw.trim();
    if is_sentinel(trimmed) {
        NOT_APPLICABLE.to_string()
    } else if unit.is_empty() {
        trimmed.to_string()
    } else {
        format!("{} {}", trimmed, unit)
    }
}

fn is_sentinel(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed == "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field() {
        assert_eq!(format_field("0", "mm"), "—");
        assert_eq!(format_field("", "mm"), "—");
        assert_eq!(format_field("  ", "mm"), "—");
        assert_eq!(format_field("150", "mm"), "150 mm");
        assert_eq!(format_field("Y12", ""), "Y12");
        assert_eq!(format_field(" 150 ", "mm"), "150 mm");
        assert_eq!(format_field(" 0 ", "mm"), "—");
    }

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(Dimension::parse(""), Dimension::NotApplicable);
        assert_eq!(Dimension::parse("0"), Dimension::NotApplicable);
        assert_eq!(Dimension::parse(" 0 "), Dimension::NotApplicable);
        assert_eq!(Dimension::parse("0.5"), Dimension::Value("0.5".to_string()));
        assert_eq!(Dimension::parse("150"), Dimension::Value("150".to_string()));
    }

    #[test]
    fn test_numeric_access() {
        assert_eq!(Dimension::from("62.5").as_f64(), Some(62.5));
        assert_eq!(Dimension::from("Y10").as_f64(), None);
        assert_eq!(Dimension::NotApplicable.as_f64(), None);
        assert!(!Dimension::NotApplicable.is_applicable());
    }

    #[test]
    fn test_display_keeps_raw_text() {
        assert_eq!(Dimension::from("150").display("mm"), "150 mm");
        assert_eq!(Dimension::from("150.0").display("mm"), "150.0 mm");
        assert_eq!(Dimension::NotApplicable.display("mm"), "—");
        assert_eq!(Dimension::from("0").to_string(), "—");
    }

    #[test]
    fn test_json() {
        let json = serde_json::to_string(&Dimension::from("95")).unwrap();
        assert_eq!(json, "\"95\"");
        assert_eq!(serde_json::to_string(&Dimension::NotApplicable).unwrap(), "null");

        let parsed: Dimension = serde_json::from_str("\"0\"").unwrap();
        assert_eq!(parsed, Dimension::NotApplicable);
        let parsed: Dimension = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Dimension::NotApplicable);
    }
}
