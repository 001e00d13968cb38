//! Legacy object definitions
//!
//! A legacy definition is what the old-generation config parser hands us:
//! a type tag, the object's identity and its attributes in file order.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// One parsed `define <type> { ... }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyObjectDefinition {
    /// Definition type tag (`command`, `hostgroup`, ...)
    #[serde(rename = "type")]
    object_type: String,

    /// Object identity (e.g. the value of `command_name`)
    name: String,

    /// Attributes in original key order
    #[serde(default)]
    attributes: IndexMap<String, String>,
}

impl LegacyObjectDefinition {
    /// Create an empty definition
    #[inline]
    #[must_use]
    pub fn new(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Append an attribute, keeping insertion order
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Definition type tag
    #[inline]
    #[must_use]
    pub fn definition_type(&self) -> &str {
        &self.object_type
    }

    /// Object identity
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate attributes in original order
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a single attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Number of attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the definition carries no attributes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Load a list of definitions from JSON
    ///
    /// # Errors
    /// Returns error if the document is not a list of definitions
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a list of definitions from YAML
    ///
    /// # Errors
    /// Returns error if the document is not a list of definitions
    pub fn list_from_yaml(yaml: &str) -> Result<Vec<Self>, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Dumps the definition back in legacy syntax
impl Display for LegacyObjectDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "define {} {{", self.object_type)?;
        for (key, value) in &self.attributes {
            writeln!(f, "    {key}\t{value}")?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_insertion_order() {
        let def = LegacyObjectDefinition::new("hostgroup", "linux")
            .with_attribute("hostgroup_name", "linux")
            .with_attribute("alias", "Linux Servers")
            .with_attribute("members", "web1,web2");

        let keys: Vec<_> = def.attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["hostgroup_name", "alias", "members"]);
        assert_eq!(def.attribute("alias"), Some("Linux Servers"));
        assert_eq!(def.len(), 3);
    }

    #[test]
    fn dump_uses_legacy_syntax() {
        let def = LegacyObjectDefinition::new("command", "check_ping")
            .with_attribute("command_name", "check_ping");

        assert_eq!(
            def.to_string(),
            "define command {\n    command_name\tcheck_ping\n}\n"
        );
    }

    #[test]
    fn load_from_yaml() {
        let yaml = r#"
- type: command
  name: check_ping
  attributes:
    command_name: check_ping
    command_line: "$USER1$/check_ping -H $HOSTADDRESS$"
- type: hostgroup
  name: empty
"#;
        let defs = LegacyObjectDefinition::list_from_yaml(yaml).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].definition_type(), "command");
        assert_eq!(
            defs[0].attribute("command_line"),
            Some("$USER1$/check_ping -H $HOSTADDRESS$")
        );
        assert!(defs[1].is_empty());
    }

    #[test]
    fn load_from_json_rejects_garbage() {
        assert!(LegacyObjectDefinition::list_from_json("{not json").is_err());
    }
}
