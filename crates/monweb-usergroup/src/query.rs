//! Queries handed to backends
//!
//! The console never touches storage. It describes what it wants as a
//! [`Query`] (table, columns, filter, sort, page) and lets the backend do
//! the rest.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter::Filter;

/// Tables a user group backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// One row per group
    Group,
    /// One row per (group, user) pair
    GroupMembership,
}

impl Table {
    /// Table name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::GroupMembership => "group_membership",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record, column name → value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, String>);

impl Row {
    /// Create an empty row
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a column value
    #[inline]
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Set a column value
    #[inline]
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    /// Column value
    #[inline]
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Iterate columns in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keep only the given columns (all columns when empty)
    #[must_use]
    pub fn project(&self, columns: &[String]) -> Self {
        if columns.is_empty() {
            return self.clone();
        }
        Self(
            columns
                .iter()
                .filter_map(|c| self.0.get(c).map(|v| (c.clone(), v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a `dir` parameter, anything but `desc` is ascending
    #[inline]
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// Parameter value
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create sort spec
    #[inline]
    #[must_use]
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Ascending on column
    #[inline]
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }
}

/// One-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Pagination {
    /// Create a page window, page and limit are at least 1
    #[inline]
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// The single-row window used by `fetch_row`
    #[inline]
    #[must_use]
    pub const fn first_row() -> Self {
        Self { page: 1, limit: 1 }
    }

    /// Rows to skip
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` rows
    #[inline]
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

/// A select against one backend table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: Table,
    pub columns: Vec<String>,
    pub filter: Filter,
    pub sort: Option<SortSpec>,
    pub pagination: Option<Pagination>,
}

impl Query {
    /// Select every column of a table
    #[inline]
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            filter: Filter::none(),
            sort: None,
            pagination: None,
        }
    }

    /// Restrict the selected columns
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Add a filter, combined with any existing one
    #[inline]
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = self.filter.and(filter);
        self
    }

    /// Shorthand for an exact identity filter
    #[inline]
    #[must_use]
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(Filter::exact(column, value))
    }

    /// Order results
    #[inline]
    #[must_use]
    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Limit results to a page
    #[inline]
    #[must_use]
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
