//! Attribute values and the legacy value transforms
//!
//! Scalars that start with a digit are numeric or duration literals and pass
//! through untouched; everything else becomes a quoted string literal.

use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LEADING_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+").expect("leading numeric pattern"));

static COMMA_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("comma separator pattern"));

/// Value of one output attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Already-rendered scalar expression
    Scalar(String),

    /// Ordered list; elements are quoted at render time
    List(Vec<String>),
}

impl AttributeValue {
    /// Scalar accessor
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// List accessor
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }

    /// Whether this value renders as an array
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

/// Renders the right-hand side of an attribute line
///
/// List elements are always escaped, even when the stored element was
/// numeric or already quoted.
impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<_> = items.iter().map(|v| escape_legacy_string(v)).collect();
                write!(f, "[ {} ]", parts.join(", "))
            }
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Whether a raw value starts with one or more ASCII digits
#[inline]
#[must_use]
pub fn is_leading_numeric(value: &str) -> bool {
    LEADING_NUMERIC.is_match(value)
}

/// Quote a raw value as a string literal
///
/// Backslashes are doubled first, then double quotes are escaped.
#[must_use]
pub fn escape_legacy_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Transform a single raw scalar
#[must_use]
pub fn migrate_scalar(value: &str) -> String {
    if is_leading_numeric(value) {
        value.to_string()
    } else {
        escape_legacy_string(value)
    }
}

/// Split a comma separated legacy list
///
/// Segments are trimmed, empty segments dropped, order kept.
#[must_use]
pub fn split_comma(value: &str) -> Vec<String> {
    COMMA_SEPARATOR
        .split(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
