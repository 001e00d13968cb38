//! Group controller actions
//!
//! Each action takes the [`Request`], resolves the backend it needs, talks
//! to the backend through capability handles and returns a view model,
//! a form outcome or a redirect.

use tracing::{debug, error, warn};

use crate::backend::{Selectable, UserGroupBackend};
use crate::capability::Capability;
use crate::config::ConsoleConfig;
use crate::error::{BackendError, ConsoleError, ConsoleResult};
use crate::filter::Filter;
use crate::form::{FormMode, FormOutcome, GroupAttributes, GroupForm};
use crate::link::{decode_html_entities, Url};
use crate::notification::Notification;
use crate::query::{Pagination, Query, Row, Table};
use crate::request::{Method, Request};
use crate::resolver::BackendResolver;
use crate::view::{
    BackendSelection, GroupDetailView, GroupListView, GroupSummary, MemberSummary, Page,
    RemoveMemberForm, SortControl, Tab, Tabs,
};

const GROUP_SORT_COLUMNS: [(&str, &str); 4] = [
    ("group_name", "Group"),
    ("parent_name", "Parent"),
    ("created_at", "Created at"),
    ("last_modified", "Last modified"),
];

/// Edits read the current row before updating it
const UPDATE_CAPABILITIES: [Capability; 2] = [Capability::Updatable, Capability::Selectable];

/// Deletes check that the group exists first
const DELETE_CAPABILITIES: [Capability; 2] = [Capability::Reducible, Capability::Selectable];

const MEMBER_SORT_COLUMNS: [(&str, &str); 3] = [
    ("user_name", "Username"),
    ("created_at", "Created at"),
    ("last_modified", "Last modified"),
];

/// Outcome of `group/removemember`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMemberOutcome {
    /// Where to go next, taken from the `redirect` field
    pub redirect: Option<Url>,
    /// One notification per attempted removal
    pub notifications: Vec<Notification>,
}

/// Controller for `group/*`
pub struct GroupController<'a> {
    resolver: BackendResolver<'a>,
    config: ConsoleConfig,
}

impl<'a> GroupController<'a> {
    /// Create controller
    #[inline]
    #[must_use]
    pub fn new(resolver: BackendResolver<'a>, config: ConsoleConfig) -> Self {
        Self { resolver, config }
    }

    /// `group` redirects to the list
    #[inline]
    #[must_use]
    pub fn index(&self) -> Url {
        Url::from_path("group/list")
    }

    /// List the groups of one backend
    ///
    /// # Errors
    /// - `ConsoleError::BackendNotFound` for an unknown `backend` parameter
    /// - `ConsoleError::UnsupportedCapability` if the named backend is not selectable
    pub fn list(&self, request: &Request) -> ConsoleResult<GroupListView> {
        let params = &request.params;
        let requested = params.get("backend");

        let options = self
            .resolver
            .load_backends(Some(Capability::Selectable))?
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        let mut view = GroupListView {
            backend_selection: BackendSelection {
                options,
                selected: requested.map(str::to_string),
            },
            backend: None,
            groups: None,
            filter: Filter::none(),
            sort: None,
            tabs: list_tabs().activate("group/list"),
            notifications: Vec::new(),
        };

        let Some(backend) = self.resolver.resolve(requested, Capability::Selectable)? else {
            debug!("no selectable user group backend configured");
            return Ok(view);
        };
        let selectable = backend.selectable()?;

        let filter = Filter::from_params(params, &GroupSummary::COLUMNS);
        let sort = SortControl::from_params(params, &GROUP_SORT_COLUMNS);
        let pagination = self.pagination(request);
        let query = Query::new(Table::Group)
            .columns(&GroupSummary::COLUMNS)
            .filter(filter.clone())
            .order_by(sort.active.clone())
            .paginate(pagination);

        match fetch_page(selectable, &query, pagination, GroupSummary::from_row) {
            Ok(page) => view.groups = Some(page),
            Err(e) => {
                error!(backend = backend.name(), error = %e, "failed to list user groups");
                view.notifications.push(Notification::error(e.to_string()));
            }
        }

        view.backend = Some(backend.name().to_string());
        view.filter = filter;
        view.sort = Some(sort);
        Ok(view)
    }

    /// Show one group and its members
    ///
    /// # Errors
    /// - `ConsoleError::MissingParameter` without `group` or `backend`
    /// - `ConsoleError::BackendNotFound` / `GroupNotFound`
    /// - `ConsoleError::UnsupportedCapability` if the backend is not selectable
    pub fn show(&self, request: &Request) -> ConsoleResult<GroupDetailView> {
        let params = &request.params;
        let group_name = params.get_required("group")?;
        let backend = self
            .resolver
            .resolve_named(params.get_required("backend")?, Capability::Selectable)?;
        let selectable = backend.selectable()?;

        let group_query = Query::new(Table::Group)
            .columns(&GroupSummary::COLUMNS)
            .where_eq("group_name", group_name);
        let group = selectable
            .fetch_row(&group_query)?
            .ok_or_else(|| ConsoleError::GroupNotFound(group_name.to_string()))?;
        let group = GroupSummary::from_row(&group)?;

        let filter = Filter::from_params(params, &MemberSummary::COLUMNS);
        let sort = SortControl::from_params(params, &MEMBER_SORT_COLUMNS);
        let pagination = self.pagination(request);
        let members_query = Query::new(Table::GroupMembership)
            .columns(&MemberSummary::COLUMNS)
            .where_eq("group_name", group_name)
            .filter(filter.clone())
            .order_by(sort.active.clone())
            .paginate(pagination);
        let members = fetch_page(selectable, &members_query, pagination, MemberSummary::from_row)?;

        let show_url = Url::from_path("group/show")
            .with_param("backend", backend.name())
            .with_param("group", group_name);
        let remove_member = backend.supports(Capability::Reducible).then(|| RemoveMemberForm {
            action: Url::from_path("group/removemember")
                .with_param("backend", backend.name())
                .with_param("group", group_name),
            redirect: show_url.clone(),
        });

        Ok(GroupDetailView {
            backend: backend.name().to_string(),
            group,
            members,
            filter,
            sort,
            tabs: show_tabs(group_name, show_url).activate("group/show"),
            remove_member,
        })
    }

    /// Add a group
    ///
    /// # Errors
    /// - `ConsoleError::MissingParameter` without `backend`
    /// - `ConsoleError::BackendNotFound`
    /// - `ConsoleError::UnsupportedCapability` if the backend is not extensible
    pub fn add(&self, request: &Request) -> ConsoleResult<FormOutcome> {
        let backend = self
            .resolver
            .resolve_named(request.params.get_required("backend")?, Capability::Extensible)?;
        let redirect = Url::from_path("group/list").with_param("backend", backend.name());

        GroupForm::new(FormMode::Add, backend.name(), GroupAttributes::default(), redirect)
            .handle_request(request, backend.as_ref())
    }

    /// Edit a group
    ///
    /// # Errors
    /// - `ConsoleError::MissingParameter` without `group` or `backend`
    /// - `ConsoleError::BackendNotFound` / `GroupNotFound`
    /// - `ConsoleError::UnsupportedCapability` if the backend is not updatable,
    ///   or not selectable since the current row is read first
    pub fn edit(&self, request: &Request) -> ConsoleResult<FormOutcome> {
        let params = &request.params;
        let group_name = params.get_required("group")?;
        let backend = self
            .resolver
            .resolve_with(params.get_required("backend")?, &UPDATE_CAPABILITIES)?;

        let query = Query::new(Table::Group)
            .columns(&["group_name", "parent_name"])
            .where_eq("group_name", group_name);
        let row = backend
            .selectable()?
            .fetch_row(&query)?
            .ok_or_else(|| ConsoleError::GroupNotFound(group_name.to_string()))?;

        let redirect = Url::from_path("group/show")
            .with_param("backend", backend.name())
            .with_param("group", group_name);
        let mode = FormMode::Edit {
            group_name: group_name.to_string(),
        };
        GroupForm::new(mode, backend.name(), GroupAttributes::from_row(&row), redirect)
            .handle_request(request, backend.as_ref())
    }

    /// Remove a group
    ///
    /// # Errors
    /// - `ConsoleError::MissingParameter` without `group` or `backend`
    /// - `ConsoleError::BackendNotFound` / `GroupNotFound`
    /// - `ConsoleError::UnsupportedCapability` if the backend is not reducible,
    ///   or not selectable since the group is looked up first
    pub fn remove(&self, request: &Request) -> ConsoleResult<FormOutcome> {
        let params = &request.params;
        let group_name = params.get_required("group")?;
        let backend = self
            .resolver
            .resolve_with(params.get_required("backend")?, &DELETE_CAPABILITIES)?;
        ensure_group_exists(backend.as_ref(), group_name)?;

        let redirect = Url::from_path("group/list").with_param("backend", backend.name());
        let mode = FormMode::Remove {
            group_name: group_name.to_string(),
        };
        GroupForm::new(mode, backend.name(), GroupAttributes::named(group_name), redirect)
            .handle_request(request, backend.as_ref())
    }

    /// Remove members from a group
    ///
    /// Every `user_name` is attempted; a failed removal becomes an error
    /// notification and the remaining members are still processed.
    ///
    /// # Errors
    /// - `ConsoleError::MethodNotAllowed` unless POST
    /// - `ConsoleError::MissingParameter` without `group`, `backend` or `user_name`
    /// - `ConsoleError::BackendNotFound` / `GroupNotFound`
    /// - `ConsoleError::UnsupportedCapability` if the backend is not reducible,
    ///   or not selectable since the group is looked up first
    pub fn remove_member(&self, request: &Request) -> ConsoleResult<RemoveMemberOutcome> {
        request.assert_method(Method::Post)?;
        let params = &request.params;
        let group_name = params.get_required("group")?;
        let backend = self
            .resolver
            .resolve_with(params.get_required("backend")?, &DELETE_CAPABILITIES)?;
        ensure_group_exists(backend.as_ref(), group_name)?;

        let user_names = params.get_all("user_name");
        if user_names.is_empty() {
            return Err(ConsoleError::missing("user_name"));
        }

        let reducible = backend.reducible()?;
        let mut notifications = Vec::with_capacity(user_names.len());
        for user_name in user_names {
            let membership = Filter::match_all(vec![
                Filter::exact("group_name", group_name),
                Filter::exact("user_name", user_name),
            ]);
            match reducible.delete(Table::GroupMembership, &membership) {
                Ok(()) => notifications.push(Notification::success(format!(
                    "User \"{user_name}\" has been removed from group \"{group_name}\""
                ))),
                Err(e) => {
                    warn!(group = group_name, user = user_name, error = %e, "failed to remove group member");
                    notifications.push(Notification::error(e.to_string()));
                }
            }
        }

        let redirect = params
            .get("redirect")
            .map(|r| Url::parse(&decode_html_entities(r)));
        Ok(RemoveMemberOutcome {
            redirect,
            notifications,
        })
    }

    fn pagination(&self, request: &Request) -> Pagination {
        let limit = request
            .params
            .get_usize("limit", self.config.default_limit)
            .clamp(1, self.config.max_limit.max(1));
        Pagination::new(request.params.get_usize("page", 1), limit)
    }
}

fn ensure_group_exists(backend: &dyn UserGroupBackend, group_name: &str) -> ConsoleResult<()> {
    let count = backend
        .selectable()?
        .count(Table::Group, &Filter::exact("group_name", group_name))?;
    if count == 0 {
        return Err(ConsoleError::GroupNotFound(group_name.to_string()));
    }
    Ok(())
}

fn fetch_page<T>(
    selectable: &dyn Selectable,
    query: &Query,
    pagination: Pagination,
    convert: fn(&Row) -> Result<T, BackendError>,
) -> Result<Page<T>, BackendError> {
    let total = selectable.count(query.table, &query.filter)?;
    let items = selectable
        .select(query)?
        .iter()
        .map(convert)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total, pagination))
}

fn list_tabs() -> Tabs {
    Tabs::new()
        .add(Tab {
            name: "user/list".into(),
            label: "Users".into(),
            title: "List users of authentication backends".into(),
            icon: "user",
            url: Url::from_path("user/list"),
        })
        .add(Tab {
            name: "group/list".into(),
            label: "Groups".into(),
            title: "List groups of user group backends".into(),
            icon: "users",
            url: Url::from_path("group/list"),
        })
}

fn show_tabs(group_name: &str, url: Url) -> Tabs {
    Tabs::new().add(Tab {
        name: "group/show".into(),
        label: "Group".into(),
        title: format!("Show group {group_name}"),
        icon: "users",
        url,
    })
}
