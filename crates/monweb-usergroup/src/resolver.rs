//! Backend resolution
//!
//! Backends are created per request from an explicit [`GroupsConfig`]
//! snapshot. A named backend must exist and carry the required capability;
//! without a name the first capable backend in section order wins.

use tracing::debug;

use crate::backend::{BackendFactory, UserGroupBackend};
use crate::capability::Capability;
use crate::config::GroupsConfig;
use crate::error::{ConsoleError, ConsoleResult};

/// Resolves backend names to live backends
pub struct BackendResolver<'a> {
    config: &'a GroupsConfig,
    factory: &'a dyn BackendFactory,
}

impl<'a> BackendResolver<'a> {
    /// Create resolver over a configuration snapshot
    #[inline]
    #[must_use]
    pub fn new(config: &'a GroupsConfig, factory: &'a dyn BackendFactory) -> Self {
        Self { config, factory }
    }

    /// Configuration snapshot in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GroupsConfig {
        self.config
    }

    /// Every configured backend implementing `capability`, in section order
    ///
    /// # Errors
    /// Returns `ConsoleError::Backend` if a section cannot be instantiated
    pub fn load_backends(
        &self,
        capability: Option<Capability>,
    ) -> ConsoleResult<Vec<Box<dyn UserGroupBackend>>> {
        let mut backends = Vec::new();
        for (name, section) in self.config.sections() {
            let candidate = self.factory.create(name, section)?;
            if capability.map_or(true, |c| candidate.supports(c)) {
                backends.push(candidate);
            }
        }
        Ok(backends)
    }

    /// Resolve a backend by name
    ///
    /// # Errors
    /// - `ConsoleError::BackendNotFound` if no section has that name
    /// - `ConsoleError::UnsupportedCapability` if the backend lacks `capability`
    pub fn resolve_named(
        &self,
        name: &str,
        capability: Capability,
    ) -> ConsoleResult<Box<dyn UserGroupBackend>> {
        self.resolve_with(name, &[capability])
    }

    /// Resolve a backend by name that implements every listed capability
    ///
    /// Capabilities are checked in order; the first missing one is reported.
    ///
    /// # Errors
    /// - `ConsoleError::BackendNotFound` if no section has that name
    /// - `ConsoleError::UnsupportedCapability` for the first missing capability
    pub fn resolve_with(
        &self,
        name: &str,
        capabilities: &[Capability],
    ) -> ConsoleResult<Box<dyn UserGroupBackend>> {
        let section = self
            .config
            .section(name)
            .ok_or_else(|| ConsoleError::BackendNotFound(name.to_string()))?;
        let backend = self.factory.create(name, section)?;
        if let Some(missing) = capabilities.iter().find(|c| !backend.supports(**c)) {
            return Err(ConsoleError::unsupported(name, *missing));
        }
        debug!(backend = name, ?capabilities, "resolved user group backend");
        Ok(backend)
    }

    /// Resolve by name, or take the first capable backend
    ///
    /// Returns `None` only when no name was given and no configured backend
    /// implements `capability`.
    ///
    /// # Errors
    /// Same as [`BackendResolver::resolve_named`] when a name is given
    pub fn resolve(
        &self,
        name: Option<&str>,
        capability: Capability,
    ) -> ConsoleResult<Option<Box<dyn UserGroupBackend>>> {
        match name {
            Some(name) => self.resolve_named(name, capability).map(Some),
            None => Ok(self.load_backends(Some(capability))?.into_iter().next()),
        }
    }
}
