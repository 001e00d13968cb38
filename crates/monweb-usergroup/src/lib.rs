//! User group console
//!
//! Resolves configured user group backends by name and capability, and
//! implements the group actions on top of them: list, show, add, edit,
//! remove and member removal.
//!
//! # Core Concepts
//!
//! - [`GroupsConfig`]: ordered backend sections, passed in explicitly
//! - [`UserGroupBackend`]: a backend advertising [`Capability`] handles
//!   ([`Selectable`], [`Extensible`], [`Updatable`], [`Reducible`])
//! - [`BackendResolver`]: named or first-capable backend lookup
//! - [`GroupController`]: request in, view model or redirect out

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod capability;
mod config;
mod controller;
mod error;
mod filter;
mod form;
mod link;
mod notification;
mod query;
mod request;
mod resolver;
mod view;

// Re-exports
pub use backend::{
    BackendConstructor, BackendFactory, BackendRegistry, Extensible, Reducible, Selectable,
    Updatable, UserGroupBackend,
};
pub use capability::Capability;
pub use config::{BackendConfig, ConfigError, ConsoleConfig, GroupsConfig};
pub use controller::{GroupController, RemoveMemberOutcome};
pub use error::{BackendError, ConsoleError, ConsoleResult};
pub use filter::Filter;
pub use form::{FormMode, FormOutcome, GroupAttributes, GroupForm};
pub use link::{decode_html_entities, Url};
pub use notification::{Notification, NotificationLevel};
pub use query::{Pagination, Query, Row, SortDirection, SortSpec, Table};
pub use request::{Method, Request, RequestParams};
pub use resolver::BackendResolver;
pub use view::{
    BackendSelection, GroupDetailView, GroupListView, GroupSummary, MemberSummary, Page,
    RemoveMemberForm, SortControl, Tab, Tabs,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
