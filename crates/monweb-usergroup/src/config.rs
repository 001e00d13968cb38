//! Console configuration
//!
//! [`GroupsConfig`] is the snapshot of configured user group backends, one
//! section per backend in file order. [`ConsoleConfig`] carries the list
//! defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One backend section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend type, selects the constructor
    backend: String,

    /// Resource the backend connects to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<String>,

    /// Type-specific options
    #[serde(flatten)]
    options: IndexMap<String, String>,
}

impl BackendConfig {
    /// Section of the given backend type
    #[inline]
    #[must_use]
    pub fn new(backend_type: impl Into<String>) -> Self {
        Self {
            backend: backend_type.into(),
            resource: None,
            options: IndexMap::new(),
        }
    }

    /// With resource name
    #[inline]
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// With a type-specific option
    #[inline]
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Backend type
    #[inline]
    #[must_use]
    pub fn backend_type(&self) -> &str {
        &self.backend
    }

    /// Resource name
    #[inline]
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Type-specific option
    #[inline]
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Configured user group backends, in section order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupsConfig {
    sections: IndexMap<String, BackendConfig>,
}

impl GroupsConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a backend section
    #[inline]
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, config: BackendConfig) -> Self {
        self.sections.insert(name.into(), config);
        self
    }

    /// Parse from TOML, one table per backend
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or a section lacks `backend`
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::InvalidToml(e.to_string()))
    }

    /// Parse from YAML, one mapping per backend
    ///
    /// # Errors
    /// Returns error if the document is not valid YAML or a section lacks `backend`
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::InvalidYaml(e.to_string()))
    }

    /// Whether a section exists
    #[inline]
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Section by name
    #[inline]
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&BackendConfig> {
        self.sections.get(name)
    }

    /// Iterate sections in order
    #[inline]
    pub fn sections(&self) -> impl Iterator<Item = (&str, &BackendConfig)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no backend is configured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// List defaults for console views
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Rows per page when `limit` is absent
    pub default_limit: usize,
    /// Upper bound for `limit`
    pub max_limit: usize,
}

impl ConsoleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default page size
    #[inline]
    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// With maximum page size
    #[inline]
    #[must_use]
    pub fn with_max_limit(mut self, limit: usize) -> Self {
        self.max_limit = limit;
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_limit: 500,
        }
    }
}

/// Config error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    InvalidToml(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_sections_keep_order() {
        let config = GroupsConfig::from_toml(
            r#"
[ldap]
backend = "ldap"
resource = "ad"
base_dn = "ou=groups,dc=example"

[db]
backend = "db"
resource = "icingaweb"
"#,
        )
        .unwrap();

        let names: Vec<_> = config.sections().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ldap", "db"]);

        let ldap = config.section("ldap").unwrap();
        assert_eq!(ldap.backend_type(), "ldap");
        assert_eq!(ldap.resource(), Some("ad"));
        assert_eq!(ldap.option("base_dn"), Some("ou=groups,dc=example"));
    }

    #[test]
    fn yaml_sections() {
        let config = GroupsConfig::from_yaml("db:\n  backend: db\n").unwrap();
        assert!(config.has_section("db"));
        assert!(!config.has_section("ldap"));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn missing_backend_type_is_rejected() {
        assert!(GroupsConfig::from_toml("[db]\nresource = \"x\"\n").is_err());
    }

    #[test]
    fn console_defaults() {
        let config = ConsoleConfig::new();
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.max_limit, 500);
        assert_eq!(config.with_max_limit(10).max_limit, 10);
    }
}
