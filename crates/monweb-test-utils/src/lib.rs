//! Testing utilities for the monweb workspace
//!
//! Shared fixtures for legacy migration tests and an in-memory user group
//! backend for console tests.

#![allow(missing_docs)]

pub mod legacy;
pub mod memory;

use monweb_usergroup::{
    BackendConfig, BackendRegistry, BackendResolver, Capability, ConsoleConfig, GroupController,
    GroupsConfig, UserGroupBackend,
};

pub use memory::MemoryBackend;

/// Backend type of sections served by [`MemoryBackend`] with every capability
pub const MEMORY_TYPE: &str = "memory";

/// Backend type of sections served read-only
pub const READONLY_TYPE: &str = "memory-readonly";

/// A console wired to one shared in-memory store
///
/// Sections `local` (every capability) and `archive` (select only) both
/// read and write `store`.
pub struct ConsoleFixture {
    pub config: GroupsConfig,
    pub registry: BackendRegistry,
    pub store: MemoryBackend,
    pub console: ConsoleConfig,
}

impl ConsoleFixture {
    /// Fixture over [`seeded_store`]
    pub fn new() -> Self {
        let config = GroupsConfig::new()
            .with_section("archive", BackendConfig::new(READONLY_TYPE))
            .with_section("local", BackendConfig::new(MEMORY_TYPE));
        Self::with_config(config, seeded_store())
    }

    /// Fixture over a given configuration and store
    pub fn with_config(config: GroupsConfig, store: MemoryBackend) -> Self {
        Self {
            config,
            registry: memory_registry(&store),
            store,
            console: ConsoleConfig::new(),
        }
    }

    /// Controller for one request
    pub fn controller(&self) -> GroupController<'_> {
        GroupController::new(BackendResolver::new(&self.config, &self.registry), self.console)
    }

    /// Resolver over the fixture configuration
    pub fn resolver(&self) -> BackendResolver<'_> {
        BackendResolver::new(&self.config, &self.registry)
    }
}

impl Default for ConsoleFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry serving [`MEMORY_TYPE`] and [`READONLY_TYPE`] sections from `store`
pub fn memory_registry(store: &MemoryBackend) -> BackendRegistry {
    let full = store.clone();
    let readonly = store.clone();
    BackendRegistry::new()
        .with_type(MEMORY_TYPE, move |name, _config| {
            Ok(Box::new(full.named(name)) as Box<dyn UserGroupBackend>)
        })
        .with_type(READONLY_TYPE, move |name, _config| {
            Ok(Box::new(
                readonly
                    .named(name)
                    .with_capabilities(&[Capability::Selectable]),
            ) as Box<dyn UserGroupBackend>)
        })
}

/// Three groups and four memberships
///
/// - `admins`: alice, bob
/// - `developers` (parent `staff`): alice, dave
/// - `staff`: carol
pub fn seeded_store() -> MemoryBackend {
    MemoryBackend::new("local")
        .with_group("admins", None, "2024-01-10T09:00:00Z")
        .with_group("staff", None, "2024-01-11T09:00:00Z")
        .with_group("developers", Some("staff"), "2024-02-01T12:30:00Z")
        .with_member("admins", "alice")
        .with_member("admins", "bob")
        .with_member("developers", "alice")
        .with_member("developers", "dave")
        .with_member("staff", "carol")
}
