//! New-generation object definitions
//!
//! [`ObjectDefinition`] is the output side of a migration: an attribute
//! block followed by `assign where` and `ignore where` rules.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::AttributeValue;

/// A single `object <type> "<name>" { ... }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    /// Output type label (`CheckCommand`, `HostGroup`, ...)
    object_type: String,

    /// Object name
    name: String,

    /// Attributes in insertion order
    attributes: IndexMap<String, AttributeValue>,

    /// `assign where` expressions
    assigns: Vec<String>,

    /// `ignore where` expressions
    ignores: Vec<String>,
}

impl ObjectDefinition {
    /// Create an empty definition
    #[inline]
    #[must_use]
    pub fn new(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            name: name.into(),
            attributes: IndexMap::new(),
            assigns: Vec::new(),
            ignores: Vec::new(),
        }
    }

    /// Output type label
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Object name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute
    ///
    /// Re-setting an existing attribute replaces the value in place and keeps
    /// its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Iterate attributes in insertion order
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes
    #[inline]
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Push an `assign where` rule
    #[inline]
    pub fn assign_where(&mut self, expression: impl Into<String>) {
        self.assigns.push(expression.into());
    }

    /// Push an `ignore where` rule
    #[inline]
    pub fn ignore_where(&mut self, expression: impl Into<String>) {
        self.ignores.push(expression.into());
    }

    /// `assign where` rules in insertion order
    #[inline]
    #[must_use]
    pub fn assigns(&self) -> &[String] {
        &self.assigns
    }

    /// `ignore where` rules in insertion order
    #[inline]
    #[must_use]
    pub fn ignores(&self) -> &[String] {
        &self.ignores
    }

    /// Render the definition as text
    #[inline]
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for ObjectDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "object {} \"{}\" {{", self.object_type, self.name)?;
        for (key, value) in &self.attributes {
            writeln!(f, "    {key} = {value}")?;
        }
        for assign in &self.assigns {
            writeln!(f, "    assign where {assign}")?;
        }
        for ignore in &self.ignores {
            writeln!(f, "    ignore where {ignore}")?;
        }
        write!(f, "}}\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_definition_renders_braces_and_blank_line() {
        let def = ObjectDefinition::new("HostGroup", "empty");
        assert_eq!(def.render(), "object HostGroup \"empty\" {\n}\n\n");
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let mut def = ObjectDefinition::new("HostGroup", "linux");
        def.ignore_where("host.name == \"db1\"");
        def.assign_where("host.name == \"web1\"");
        def.set("display_name", "\"Linux\"");
        def.set("groups", vec!["all".to_string()]);

        let expected = "object HostGroup \"linux\" {\n\
                        \x20   display_name = \"Linux\"\n\
                        \x20   groups = [ \"all\" ]\n\
                        \x20   assign where host.name == \"web1\"\n\
                        \x20   ignore where host.name == \"db1\"\n\
                        }\n\n";
        assert_eq!(def.render(), expected);
    }

    #[test]
    fn reset_keeps_position() {
        let mut def = ObjectDefinition::new("CheckCommand", "x");
        def.set("a", "1");
        def.set("b", "2");
        def.set("a", "3");

        let keys: Vec<_> = def.attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(def.get("a").and_then(AttributeValue::as_scalar), Some("3"));
    }

    #[test]
    fn render_is_repeatable() {
        let mut def = ObjectDefinition::new("CheckCommand", "check_ping");
        def.set("command", "\"check_ping\"");
        def.set("timeout", "30s");
        assert_eq!(def.render(), def.render());
    }
}
