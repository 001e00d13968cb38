//! Row filters
//!
//! Equality conditions combined with AND. [`Filter::equal`] values may
//! contain `*` wildcards and compare case-insensitively like the console's
//! filter editor does; [`Filter::exact`] names one row by its identity.

use regex::RegexBuilder;

use crate::query::Row;
use crate::request::RequestParams;

/// A filter over row columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every child must match; empty matches all rows
    All(Vec<Filter>),

    /// Column equals value (`*` matches any run of characters)
    Equal { column: String, value: String },

    /// Column equals value byte for byte, no wildcards
    Exact { column: String, value: String },
}

impl Filter {
    /// Filter matching every row
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::All(Vec::new())
    }

    /// Equality condition
    #[inline]
    #[must_use]
    pub fn equal(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equal {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Identity condition matching only the literal value
    #[inline]
    #[must_use]
    pub fn exact(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Exact {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Conjunction of filters
    #[inline]
    #[must_use]
    pub fn match_all(filters: Vec<Filter>) -> Self {
        Self::All(filters)
    }

    /// Combine with another filter
    #[must_use]
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (a, b) if a.is_empty() => b,
            (a, b) if b.is_empty() => a,
            (Self::All(mut children), Self::All(more)) => {
                children.extend(more);
                Self::All(children)
            }
            (Self::All(mut children), b) => {
                children.push(b);
                Self::All(children)
            }
            (a, b) => Self::All(vec![a, b]),
        }
    }

    /// Whether the filter has no conditions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All(children) => children.iter().all(Filter::is_empty),
            Self::Equal { .. } | Self::Exact { .. } => false,
        }
    }

    /// Evaluate against a row; a missing column never matches
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::All(children) => children.iter().all(|f| f.matches(row)),
            Self::Equal { column, value } => row
                .get(column)
                .is_some_and(|actual| wildcard_match(value, actual)),
            Self::Exact { column, value } => row.get(column) == Some(value.as_str()),
        }
    }

    /// Value of the first equality condition on `column`
    #[must_use]
    pub fn value_for(&self, column: &str) -> Option<&str> {
        match self {
            Self::All(children) => children.iter().find_map(|f| f.value_for(column)),
            Self::Equal { column: c, value } | Self::Exact { column: c, value }
                if c == column =>
            {
                Some(value)
            }
            Self::Equal { .. } | Self::Exact { .. } => None,
        }
    }

    /// Build a filter from request parameters
    ///
    /// Only parameters naming one of `columns` become conditions; control
    /// parameters like `limit` or `sort` are never filter columns.
    #[must_use]
    pub fn from_params(params: &RequestParams, columns: &[&str]) -> Self {
        let conditions = params
            .iter()
            .filter(|(name, value)| columns.contains(name) && !value.is_empty())
            .map(|(name, value)| Self::equal(name, value))
            .collect();
        Self::All(conditions)
    }
}

fn wildcard_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern.eq_ignore_ascii_case(value);
    }
    let expression = format!("^{}$", regex::escape(pattern).replace(r"\*", ".*"));
    RegexBuilder::new(&expression)
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(value))
}
