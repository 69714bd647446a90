//! Transit line identity and geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Polyline;

/// Error returned when parsing an invalid line id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line id: {reason}")]
pub struct InvalidLineId {
    reason: &'static str,
}

/// Catalog key of a transit line.
///
/// Line ids double as asset file stems (`routes/{id}.geojson`), so they are
/// restricted to ASCII letters, digits, `-` and `_`.
///
/// # Examples
///
/// ```
/// use route_server::domain::LineId;
///
/// let id = LineId::parse("ruta106Ida").unwrap();
/// assert_eq!(id.as_str(), "ruta106Ida");
///
/// assert!(LineId::parse("").is_err());
/// assert!(LineId::parse("../etc/passwd").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId(String);

impl LineId {
    /// Parse a line id.
    pub fn parse(s: &str) -> Result<Self, InvalidLineId> {
        if s.is_empty() {
            return Err(InvalidLineId {
                reason: "must not be empty",
            });
        }
        if s.len() > 64 {
            return Err(InvalidLineId {
                reason: "must be at most 64 characters",
            });
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(InvalidLineId {
                reason: "must contain only ASCII letters, digits, '-' and '_'",
            });
        }
        Ok(LineId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineId {
    type Error = InvalidLineId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LineId::parse(&value)
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the line catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    pub id: LineId,
    pub name: String,
}

impl LineEntry {
    pub fn new(id: LineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A transit line with its loaded geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitLine {
    pub id: LineId,
    pub name: String,
    pub description: Option<String>,
    pub polyline: Polyline,
}

impl TransitLine {
    pub fn new(id: LineId, name: impl Into<String>, polyline: Polyline) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            polyline,
        }
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(LineId::parse("ruta106Ida").is_ok());
        assert!(LineId::parse("ruta-106_regreso").is_ok());
        assert!(LineId::parse("7").is_ok());
    }

    #[test]
    fn reject_path_characters() {
        assert!(LineId::parse("a/b").is_err());
        assert!(LineId::parse("..").is_err());
        assert!(LineId::parse("ruta 106").is_err());
        assert!(LineId::parse("rutá").is_err());
    }

    #[test]
    fn reject_too_long() {
        assert!(LineId::parse(&"a".repeat(65)).is_err());
        assert!(LineId::parse(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn display_and_debug() {
        let id = LineId::parse("ruta110Ida").unwrap();
        assert_eq!(id.to_string(), "ruta110Ida");
        assert_eq!(format!("{:?}", id), "LineId(ruta110Ida)");
    }

    #[test]
    fn entry_deserializes_and_validates() {
        let entry: LineEntry =
            serde_json::from_str(r#"{"id": "ruta106Ida", "name": "Ruta 106 - Ida"}"#).unwrap();
        assert_eq!(entry.id.as_str(), "ruta106Ida");
        assert_eq!(entry.name, "Ruta 106 - Ida");

        let bad: Result<LineEntry, _> = serde_json::from_str(r#"{"id": "a/b", "name": "x"}"#);
        assert!(bad.is_err());
    }
}
