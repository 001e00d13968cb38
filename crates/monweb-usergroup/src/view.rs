//! View models handed to the renderer

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BackendError;
use crate::filter::Filter;
use crate::link::Url;
use crate::notification::Notification;
use crate::query::{Pagination, Row, SortDirection, SortSpec};
use crate::request::RequestParams;

fn required(row: &Row, column: &str) -> Result<String, BackendError> {
    row.get(column)
        .map(str::to_string)
        .ok_or_else(|| BackendError::InvalidRow(format!("missing column '{column}'")))
}

fn optional(row: &Row, column: &str) -> Option<String> {
    row.get(column).filter(|v| !v.is_empty()).map(str::to_string)
}

fn timestamp(row: &Row, column: &str) -> Result<Option<DateTime<Utc>>, BackendError> {
    match row.get(column).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| BackendError::InvalidRow(format!("{column}: {e}"))),
    }
}

/// One group in a list or detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub group_name: String,
    pub parent_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl GroupSummary {
    /// Columns selected for group views
    pub const COLUMNS: [&'static str; 4] =
        ["group_name", "parent_name", "created_at", "last_modified"];

    /// Build from a backend row
    ///
    /// # Errors
    /// Returns `BackendError::InvalidRow` if `group_name` is missing or a
    /// timestamp is not RFC 3339
    pub fn from_row(row: &Row) -> Result<Self, BackendError> {
        Ok(Self {
            group_name: required(row, "group_name")?,
            parent_name: optional(row, "parent_name"),
            created_at: timestamp(row, "created_at")?,
            last_modified: timestamp(row, "last_modified")?,
        })
    }
}

/// One member in a group detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub user_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl MemberSummary {
    /// Columns selected for member lists
    pub const COLUMNS: [&'static str; 3] = ["user_name", "created_at", "last_modified"];

    /// Build from a backend row
    ///
    /// # Errors
    /// Returns `BackendError::InvalidRow` if `user_name` is missing or a
    /// timestamp is not RFC 3339
    pub fn from_row(row: &Row) -> Result<Self, BackendError> {
        Ok(Self {
            user_name: required(row, "user_name")?,
            created_at: timestamp(row, "created_at")?,
            last_modified: timestamp(row, "last_modified")?,
        })
    }
}

/// A page of items plus the total behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    /// Assemble a page
    #[inline]
    #[must_use]
    pub fn new(items: Vec<T>, total: usize, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        }
    }

    /// Number of pages
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        Pagination::new(self.page, self.limit).page_count(self.total)
    }
}

/// Sortable columns of a view plus the active sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortControl {
    /// Column → label
    pub columns: Vec<(&'static str, &'static str)>,
    pub active: SortSpec,
}

impl SortControl {
    /// Read `sort`/`dir`; unknown columns fall back to the first column
    #[must_use]
    pub fn from_params(
        params: &RequestParams,
        columns: &[(&'static str, &'static str)],
    ) -> Self {
        let default_column = columns.first().map_or("", |(c, _)| *c);
        let column = params
            .get("sort")
            .filter(|s| columns.iter().any(|(c, _)| c == s))
            .unwrap_or(default_column);
        Self {
            columns: columns.to_vec(),
            active: SortSpec::new(column, SortDirection::from_param(params.get("dir"))),
        }
    }
}

/// A tab above a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub name: String,
    pub label: String,
    pub title: String,
    pub icon: &'static str,
    pub url: Url,
}

/// Tab bar with an active tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tabs {
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl Tabs {
    /// Empty tab bar
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab
    #[must_use]
    pub fn add(mut self, tab: Tab) -> Self {
        self.tabs.push(tab);
        self
    }

    /// Mark a tab active; unknown names leave nothing active
    #[must_use]
    pub fn activate(mut self, name: &str) -> Self {
        self.active = self
            .tabs
            .iter()
            .any(|t| t.name == name)
            .then(|| name.to_string());
        self
    }

    /// Tabs in order
    #[inline]
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Active tab name
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

/// Auto-submitting backend selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSelection {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// `group/list`
#[derive(Debug, Clone)]
pub struct GroupListView {
    pub backend_selection: BackendSelection,
    /// Resolved backend; `None` when no selectable backend is configured
    pub backend: Option<String>,
    /// `None` when listing failed or there is no backend
    pub groups: Option<Page<GroupSummary>>,
    pub filter: Filter,
    pub sort: Option<SortControl>,
    pub tabs: Tabs,
    pub notifications: Vec<Notification>,
}

/// Hidden form posting selected members to `group/removemember`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMemberForm {
    pub action: Url,
    pub redirect: Url,
}

/// `group/show`
#[derive(Debug, Clone)]
pub struct GroupDetailView {
    pub backend: String,
    pub group: GroupSummary,
    pub members: Page<MemberSummary>,
    pub filter: Filter,
    pub sort: SortControl,
    pub tabs: Tabs,
    /// Present only for reducible backends
    pub remove_member: Option<RemoveMemberForm>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_summary_from_row() {
        let row = Row::new()
            .with("group_name", "admins")
            .with("parent_name", "")
            .with("created_at", "2024-03-01T10:00:00+02:00");
        let group = GroupSummary::from_row(&row).unwrap();

        assert_eq!(group.group_name, "admins");
        assert_eq!(group.parent_name, None);
        assert_eq!(
            group.created_at.unwrap().to_rfc3339(),
            "2024-03-01T08:00:00+00:00"
        );
        assert_eq!(group.last_modified, None);
    }

    #[test]
    fn bad_rows_are_rejected() {
        assert!(GroupSummary::from_row(&Row::new()).is_err());
        let row = Row::new().with("user_name", "alice").with("created_at", "yesterday");
        assert!(MemberSummary::from_row(&row).is_err());
    }

    #[test]
    fn sort_control_falls_back() {
        let columns = [("group_name", "Group"), ("created_at", "Created at")];
        let sort = SortControl::from_params(&RequestParams::from_query("sort=bogus&dir=desc"), &columns);
        assert_eq!(sort.active, SortSpec::new("group_name", SortDirection::Desc));

        let sort = SortControl::from_params(&RequestParams::from_query("sort=created_at"), &columns);
        assert_eq!(sort.active, SortSpec::asc("created_at"));
    }

    #[test]
    fn tabs_activate_known_only() {
        let tab = Tab {
            name: "group/list".into(),
            label: "Groups".into(),
            title: "List groups".into(),
            icon: "users",
            url: Url::from_path("group/list"),
        };
        let tabs = Tabs::new().add(tab.clone()).activate("group/list");
        assert_eq!(tabs.active(), Some("group/list"));
        assert_eq!(Tabs::new().add(tab).activate("nope").active(), None);
    }

    #[test]
    fn page_count() {
        let page: Page<()> = Page::new(Vec::new(), 51, Pagination::new(1, 25));
        assert_eq!(page.page_count(), 3);
    }
}
