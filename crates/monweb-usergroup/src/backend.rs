//! Backend capability traits
//!
//! A user group backend implements any subset of [`Selectable`],
//! [`Extensible`], [`Updatable`] and [`Reducible`] and advertises them
//! through the `as_*` accessors of [`UserGroupBackend`]. Actions ask for
//! the capability they need and get a typed handle or an
//! `UnsupportedCapability` error.

use indexmap::IndexMap;

use crate::capability::Capability;
use crate::config::BackendConfig;
use crate::error::{BackendError, ConsoleError, ConsoleResult};
use crate::filter::Filter;
use crate::query::{Pagination, Query, Row, Table};

/// Backends that can be queried
pub trait Selectable {
    /// Rows matching the query, sorted and paginated
    fn select(&self, query: &Query) -> Result<Vec<Row>, BackendError>;

    /// Number of rows in `table` matching `filter`
    fn count(&self, table: Table, filter: &Filter) -> Result<usize, BackendError>;

    /// First row of the query, if any
    fn fetch_row(&self, query: &Query) -> Result<Option<Row>, BackendError> {
        let single = query.clone().paginate(Pagination::first_row());
        Ok(self.select(&single)?.into_iter().next())
    }
}

/// Backends that accept new rows
pub trait Extensible {
    fn insert(&self, table: Table, values: Row) -> Result<(), BackendError>;
}

/// Backends that can change rows in place
pub trait Updatable {
    fn update(&self, table: Table, values: Row, filter: &Filter) -> Result<(), BackendError>;
}

/// Backends that can delete rows
pub trait Reducible {
    fn delete(&self, table: Table, filter: &Filter) -> Result<(), BackendError>;
}

/// A named user group backend
pub trait UserGroupBackend: Send + Sync {
    /// Configuration section name
    fn name(&self) -> &str;

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        None
    }

    fn as_extensible(&self) -> Option<&dyn Extensible> {
        None
    }

    fn as_updatable(&self) -> Option<&dyn Updatable> {
        None
    }

    fn as_reducible(&self) -> Option<&dyn Reducible> {
        None
    }

    /// Whether the backend implements `capability`
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Selectable => self.as_selectable().is_some(),
            Capability::Extensible => self.as_extensible().is_some(),
            Capability::Updatable => self.as_updatable().is_some(),
            Capability::Reducible => self.as_reducible().is_some(),
        }
    }
}

impl std::fmt::Debug for dyn UserGroupBackend + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let capabilities: Vec<_> = Capability::ALL
            .into_iter()
            .filter(|c| self.supports(*c))
            .map(Capability::as_str)
            .collect();
        f.debug_struct("UserGroupBackend")
            .field("name", &self.name())
            .field("capabilities", &capabilities)
            .finish()
    }
}

impl dyn UserGroupBackend + '_ {
    /// Selectable handle or `UnsupportedCapability`
    ///
    /// # Errors
    /// Returns `ConsoleError::UnsupportedCapability` if not selectable
    pub fn selectable(&self) -> ConsoleResult<&dyn Selectable> {
        self.as_selectable()
            .ok_or_else(|| ConsoleError::unsupported(self.name(), Capability::Selectable))
    }

    /// Extensible handle or `UnsupportedCapability`
    ///
    /// # Errors
    /// Returns `ConsoleError::UnsupportedCapability` if not extensible
    pub fn extensible(&self) -> ConsoleResult<&dyn Extensible> {
        self.as_extensible()
            .ok_or_else(|| ConsoleError::unsupported(self.name(), Capability::Extensible))
    }

    /// Updatable handle or `UnsupportedCapability`
    ///
    /// # Errors
    /// Returns `ConsoleError::UnsupportedCapability` if not updatable
    pub fn updatable(&self) -> ConsoleResult<&dyn Updatable> {
        self.as_updatable()
            .ok_or_else(|| ConsoleError::unsupported(self.name(), Capability::Updatable))
    }

    /// Reducible handle or `UnsupportedCapability`
    ///
    /// # Errors
    /// Returns `ConsoleError::UnsupportedCapability` if not reducible
    pub fn reducible(&self) -> ConsoleResult<&dyn Reducible> {
        self.as_reducible()
            .ok_or_else(|| ConsoleError::unsupported(self.name(), Capability::Reducible))
    }
}

/// Creates backends from configuration sections
pub trait BackendFactory {
    /// Instantiate the backend configured under `name`
    ///
    /// # Errors
    /// Returns error if the section's backend type is unknown or invalid
    fn create(
        &self,
        name: &str,
        config: &BackendConfig,
    ) -> Result<Box<dyn UserGroupBackend>, BackendError>;
}

/// Constructor for one backend type
pub type BackendConstructor = Box<
    dyn Fn(&str, &BackendConfig) -> Result<Box<dyn UserGroupBackend>, BackendError>
        + Send
        + Sync,
>;

/// Factory dispatching on the section's `backend` type
#[derive(Default)]
pub struct BackendRegistry {
    constructors: IndexMap<String, BackendConstructor>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("types", &self.types())
            .finish()
    }
}

impl BackendRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a backend type
    pub fn register<F>(&mut self, backend_type: impl Into<String>, constructor: F)
    where
        F: Fn(&str, &BackendConfig) -> Result<Box<dyn UserGroupBackend>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(backend_type.into(), Box::new(constructor));
    }

    /// Builder form of [`BackendRegistry::register`]
    #[must_use]
    pub fn with_type<F>(mut self, backend_type: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&str, &BackendConfig) -> Result<Box<dyn UserGroupBackend>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.register(backend_type, constructor);
        self
    }

    /// Registered backend types
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

impl BackendFactory for BackendRegistry {
    fn create(
        &self,
        name: &str,
        config: &BackendConfig,
    ) -> Result<Box<dyn UserGroupBackend>, BackendError> {
        let constructor = self
            .constructors
            .get(config.backend_type())
            .ok_or_else(|| BackendError::UnknownType(config.backend_type().to_string()))?;
        constructor(name, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnly {
        name: String,
    }

    impl Selectable for ReadOnly {
        fn select(&self, _query: &Query) -> Result<Vec<Row>, BackendError> {
            Ok(vec![
                Row::new().with("group_name", "a"),
                Row::new().with("group_name", "b"),
            ])
        }

        fn count(&self, _table: Table, _filter: &Filter) -> Result<usize, BackendError> {
            Ok(2)
        }
    }

    impl UserGroupBackend for ReadOnly {
        fn name(&self) -> &str {
            &self.name
        }

        fn as_selectable(&self) -> Option<&dyn Selectable> {
            Some(self)
        }
    }

    fn registry() -> BackendRegistry {
        BackendRegistry::new().with_type("readonly", |name, _config| {
            Ok(Box::new(ReadOnly {
                name: name.to_string(),
            }) as Box<dyn UserGroupBackend>)
        })
    }

    #[test]
    fn capability_accessors() {
        let backend: Box<dyn UserGroupBackend> = Box::new(ReadOnly {
            name: "files".into(),
        });
        assert!(backend.supports(Capability::Selectable));
        assert!(!backend.supports(Capability::Reducible));
        assert!(backend.selectable().is_ok());

        let err = backend.reducible().err().unwrap();
        assert_eq!(err.to_string(), "user group backend \"files\" is not reducible");
    }

    fn group_count(backend: &dyn UserGroupBackend) -> ConsoleResult<usize> {
        Ok(backend.selectable()?.count(Table::Group, &Filter::none())?)
    }

    #[test]
    fn capability_handles_through_borrowed_backend() {
        let backend = ReadOnly { name: "files".into() };
        assert_eq!(group_count(&backend).unwrap(), 2);
        assert!((&backend as &dyn UserGroupBackend).reducible().is_err());
    }

    #[test]
    fn fetch_row_returns_first() {
        let backend = ReadOnly { name: "files".into() };
        let row = backend.fetch_row(&Query::new(Table::Group)).unwrap();
        assert_eq!(row.unwrap().get("group_name"), Some("a"));
    }

    #[test]
    fn registry_dispatches_on_type() {
        let registry = registry();
        assert_eq!(registry.types(), vec!["readonly"]);

        let backend = registry
            .create("files", &BackendConfig::new("readonly"))
            .unwrap();
        assert_eq!(backend.name(), "files");

        let err = registry
            .create("ldap", &BackendConfig::new("ldap"))
            .err()
            .unwrap();
        assert_eq!(err, BackendError::UnknownType("ldap".into()));
    }

    #[test]
    fn debug_lists_capabilities() {
        let backend: Box<dyn UserGroupBackend> = Box::new(ReadOnly { name: "files".into() });
        let debug = format!("{backend:?}");
        assert!(debug.contains("selectable"));
        assert!(!debug.contains("reducible"));
    }
}
