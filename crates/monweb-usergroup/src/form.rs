//! Group create/edit/remove forms
//!
//! A [`GroupForm`] is rendered on GET and handled on POST. Successful
//! submissions redirect; validation and backend failures re-render the form
//! with errors attached.

use tracing::{info, warn};

use crate::backend::UserGroupBackend;
use crate::error::ConsoleResult;
use crate::filter::Filter;
use crate::link::Url;
use crate::notification::Notification;
use crate::query::{Row, Table};
use crate::request::{Request, RequestParams};

/// Editable group attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAttributes {
    pub group_name: String,
    pub parent_name: Option<String>,
}

impl GroupAttributes {
    /// Attributes with a name only
    #[inline]
    #[must_use]
    pub fn named(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            parent_name: None,
        }
    }

    /// Read submitted form values
    #[must_use]
    pub fn from_params(params: &RequestParams) -> Self {
        Self {
            group_name: params.get("group_name").unwrap_or_default().trim().to_string(),
            parent_name: params
                .get_submitted("parent_name")
                .map(|p| p.trim().to_string()),
        }
    }

    /// Read an existing row
    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        Self {
            group_name: row.get("group_name").unwrap_or_default().to_string(),
            parent_name: row
                .get("parent_name")
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }

    /// Validation messages, empty when valid
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.group_name.is_empty() {
            errors.push("the group name is required".to_string());
        }
        if !self.group_name.is_empty() && self.parent_name.as_deref() == Some(self.group_name.as_str()) {
            errors.push("a group cannot be its own parent".to_string());
        }
        errors
    }

    /// Row values for insert/update
    ///
    /// A parent submitted empty is written as an empty column, which clears
    /// it; an absent parent leaves the column untouched.
    #[must_use]
    pub fn to_row(&self) -> Row {
        let mut row = Row::new().with("group_name", self.group_name.clone());
        if let Some(parent) = &self.parent_name {
            row.set("parent_name", parent.clone());
        }
        row
    }
}

/// What the form does on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { group_name: String },
    Remove { group_name: String },
}

/// A group form ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupForm {
    pub mode: FormMode,
    pub backend: String,
    pub values: GroupAttributes,
    pub errors: Vec<String>,
    pub redirect: Url,
}

/// Result of handling a form request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Show (or re-show) the form
    Render(GroupForm),

    /// Submission succeeded
    Redirect {
        url: Url,
        notifications: Vec<Notification>,
    },
}

impl FormOutcome {
    /// Redirect target, if the submission succeeded
    #[inline]
    #[must_use]
    pub fn redirect_url(&self) -> Option<&Url> {
        match self {
            Self::Redirect { url, .. } => Some(url),
            Self::Render(_) => None,
        }
    }
}

impl GroupForm {
    /// Create a form
    #[must_use]
    pub fn new(mode: FormMode, backend: &str, values: GroupAttributes, redirect: Url) -> Self {
        Self {
            mode,
            backend: backend.to_string(),
            values,
            errors: Vec::new(),
            redirect,
        }
    }

    /// Render on GET, submit on POST
    ///
    /// # Errors
    /// Returns `ConsoleError::UnsupportedCapability` if the backend cannot
    /// perform the form's operation
    pub fn handle_request(
        mut self,
        request: &Request,
        backend: &dyn UserGroupBackend,
    ) -> ConsoleResult<FormOutcome> {
        if !request.is_post() {
            return Ok(FormOutcome::Render(self));
        }
        if !matches!(self.mode, FormMode::Remove { .. }) {
            self.values = GroupAttributes::from_params(&request.params);
            self.errors = self.values.validate();
            if !self.errors.is_empty() {
                return Ok(FormOutcome::Render(self));
            }
        }

        let (result, message) = match &self.mode {
            FormMode::Add => (
                backend
                    .extensible()?
                    .insert(Table::Group, self.values.to_row()),
                format!("Group \"{}\" has been successfully added", self.values.group_name),
            ),
            FormMode::Edit { group_name } => (
                backend.updatable()?.update(
                    Table::Group,
                    self.values.to_row(),
                    &Filter::exact("group_name", group_name.as_str()),
                ),
                format!("Group \"{group_name}\" has been edited"),
            ),
            FormMode::Remove { group_name } => (
                backend
                    .reducible()?
                    .delete(Table::Group, &Filter::exact("group_name", group_name.as_str())),
                format!("Group \"{group_name}\" has been removed"),
            ),
        };

        match result {
            Ok(()) => {
                info!(backend = %self.backend, "{message}");
                Ok(FormOutcome::Redirect {
                    url: self.redirect,
                    notifications: vec![Notification::success(message)],
                })
            }
            Err(e) => {
                warn!(backend = %self.backend, error = %e, "group form submission failed");
                self.errors.push(e.to_string());
                Ok(FormOutcome::Render(self))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_from_params_trim() {
        let params = RequestParams::from_query("group_name=+admins+&parent_name=staff");
        let attrs = GroupAttributes::from_params(&params);
        assert_eq!(attrs.group_name, "admins");
        assert_eq!(attrs.parent_name.as_deref(), Some("staff"));
        assert!(attrs.validate().is_empty());
    }

    #[test]
    fn validation_messages() {
        assert_eq!(GroupAttributes::default().validate().len(), 1);
        let own_parent = GroupAttributes {
            group_name: "a".into(),
            parent_name: Some("a".into()),
        };
        assert_eq!(own_parent.validate(), vec!["a group cannot be its own parent"]);
    }

    #[test]
    fn empty_parent_is_kept_as_cleared() {
        let attrs = GroupAttributes::from_params(&RequestParams::from_query("group_name=ops&parent_name="));
        assert_eq!(attrs.parent_name.as_deref(), Some(""));
        assert!(attrs.validate().is_empty());
        assert_eq!(attrs.to_row().get("parent_name"), Some(""));

        let attrs = GroupAttributes::from_params(&RequestParams::from_query("group_name=ops"));
        assert_eq!(attrs.parent_name, None);
    }

    #[test]
    fn to_row_skips_missing_parent() {
        let row = GroupAttributes::named("admins").to_row();
        assert_eq!(row.get("group_name"), Some("admins"));
        assert_eq!(row.get("parent_name"), None);
    }
}
