//! Supported object kinds and their attribute tables
//!
//! Each [`ObjectKind`] owns a static [`AttributeMapping`]: a rename table,
//! the set of list-valued legacy keys and a table of override converters
//! for keys that need reshaping rather than renaming.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::definition::ObjectDefinition;
use crate::error::UnknownKindError;
use crate::value::{escape_legacy_string, migrate_scalar, split_comma};

/// Converter for a single legacy attribute
///
/// Receives the definition under construction and the raw legacy value.
pub type Converter = fn(&mut ObjectDefinition, &str);

/// Static attribute tables for one object kind
#[derive(Debug)]
pub struct AttributeMapping {
    renames: &'static [(&'static str, &'static str)],
    list_valued: &'static [&'static str],
    overrides: &'static [(&'static str, Converter)],
}

impl AttributeMapping {
    /// New attribute name for a legacy key
    #[inline]
    #[must_use]
    pub fn rename(&self, key: &str) -> Option<&'static str> {
        self.renames
            .iter()
            .find(|(legacy, _)| *legacy == key)
            .map(|(_, new)| *new)
    }

    /// Whether the legacy key holds a comma separated list
    #[inline]
    #[must_use]
    pub fn is_list_valued(&self, key: &str) -> bool {
        self.list_valued.contains(&key)
    }

    /// Override converter for a legacy key
    #[inline]
    #[must_use]
    pub fn override_for(&self, key: &str) -> Option<Converter> {
        self.overrides
            .iter()
            .find(|(legacy, _)| *legacy == key)
            .map(|(_, convert)| *convert)
    }

    /// Whether the key is handled at all
    #[inline]
    #[must_use]
    pub fn handles(&self, key: &str) -> bool {
        self.override_for(key).is_some() || self.rename(key).is_some()
    }

    /// Rename table in declaration order
    #[inline]
    #[must_use]
    pub fn renames(&self) -> &'static [(&'static str, &'static str)] {
        self.renames
    }

    /// Legacy keys split on commas
    #[inline]
    #[must_use]
    pub fn list_valued(&self) -> &'static [&'static str] {
        self.list_valued
    }

    /// Legacy keys handled by override converters
    #[inline]
    pub fn override_keys(&self) -> impl Iterator<Item = &'static str> {
        self.overrides.iter().map(|(key, _)| *key)
    }
}

static COMMAND_MAPPING: AttributeMapping = AttributeMapping {
    renames: &[("timeout", "timeout")],
    list_valued: &[],
    overrides: &[
        ("command_name", skip_identity),
        ("command_line", convert_command_line),
    ],
};

static HOSTGROUP_MAPPING: AttributeMapping = AttributeMapping {
    renames: &[
        ("alias", "display_name"),
        ("notes", "notes"),
        ("notes_url", "notes_url"),
        ("action_url", "action_url"),
        ("hostgroup_members", "groups"),
    ],
    list_valued: &["hostgroup_members"],
    overrides: &[
        ("hostgroup_name", skip_identity),
        ("members", convert_members),
    ],
};

/// Legacy object kinds with a new-generation counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `define command` → `object CheckCommand`
    Command,

    /// `define hostgroup` → `object HostGroup`
    Hostgroup,
}

impl ObjectKind {
    /// Every supported kind
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Command, ObjectKind::Hostgroup];

    /// Resolve a legacy type tag
    #[inline]
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "command" => Some(Self::Command),
            "hostgroup" => Some(Self::Hostgroup),
            _ => None,
        }
    }

    /// Legacy type tag
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Hostgroup => "hostgroup",
        }
    }

    /// Output object type label
    #[inline]
    #[must_use]
    pub const fn object_type(self) -> &'static str {
        match self {
            Self::Command => "CheckCommand",
            Self::Hostgroup => "HostGroup",
        }
    }

    /// Attribute tables for this kind
    #[inline]
    #[must_use]
    pub fn mapping(self) -> &'static AttributeMapping {
        match self {
            Self::Command => &COMMAND_MAPPING,
            Self::Hostgroup => &HOSTGROUP_MAPPING,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// The identity attribute already names the object
fn skip_identity(_def: &mut ObjectDefinition, _value: &str) {}

const PLUGIN_DIR_MACRO: &str = "$USER1$";

/// `$USER1$/check_x ...` becomes `PluginDir + "/check_x ..."`
fn convert_command_line(def: &mut ObjectDefinition, value: &str) {
    let command = match value.strip_prefix(PLUGIN_DIR_MACRO) {
        Some(rest) => format!("PluginDir + {}", escape_legacy_string(rest)),
        None => escape_legacy_string(value),
    };
    def.set("command", command);
}

/// Host members turn into assign/ignore rules
///
/// `*` matches every host and `!name` excludes a host.
fn convert_members(def: &mut ObjectDefinition, value: &str) {
    for member in split_comma(value) {
        if member == "*" {
            def.assign_where("true");
        } else if let Some(excluded) = member.strip_prefix('!') {
            def.ignore_where(format!("host.name == {}", escape_legacy_string(excluded)));
        } else {
            def.assign_where(format!("host.name == {}", escape_legacy_string(&member)));
        }
    }
}

/// Apply the rename table and value transform for a plain key
pub(crate) fn apply_mapped(
    mapping: &AttributeMapping,
    def: &mut ObjectDefinition,
    key: &str,
    new_key: &str,
    value: &str,
) {
    if mapping.is_list_valued(key) {
        let items: Vec<String> = split_comma(value)
            .iter()
            .map(|item| migrate_scalar(item))
            .collect();
        def.set(new_key, items);
    } else {
        def.set(new_key, migrate_scalar(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_tag(kind.tag()), Some(kind));
            assert_eq!(kind.tag().parse::<ObjectKind>().unwrap(), kind);
        }
        assert_eq!(ObjectKind::from_tag("service"), None);
        let err = "service".parse::<ObjectKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown object kind \"service\"");
    }

    #[test]
    fn output_type_labels() {
        assert_eq!(ObjectKind::Command.object_type(), "CheckCommand");
        assert_eq!(ObjectKind::Hostgroup.object_type(), "HostGroup");
    }

    #[test]
    fn hostgroup_tables() {
        let mapping = ObjectKind::Hostgroup.mapping();
        assert_eq!(mapping.rename("alias"), Some("display_name"));
        assert!(mapping.is_list_valued("hostgroup_members"));
        assert!(!mapping.is_list_valued("alias"));
        assert!(mapping.override_for("members").is_some());
        assert!(mapping.handles("hostgroup_name"));
        assert!(!mapping.handles("check_interval"));
    }

    #[test]
    fn command_line_with_plugin_dir() {
        let mut def = ObjectDefinition::new("CheckCommand", "check_ping");
        convert_command_line(&mut def, "$USER1$/check_ping -H $HOSTADDRESS$");
        assert_eq!(
            def.get("command").and_then(|v| v.as_scalar()),
            Some("PluginDir + \"/check_ping -H $HOSTADDRESS$\"")
        );
    }

    #[test]
    fn command_line_absolute_path() {
        let mut def = ObjectDefinition::new("CheckCommand", "check_local");
        convert_command_line(&mut def, "/usr/bin/check_local");
        assert_eq!(
            def.get("command").and_then(|v| v.as_scalar()),
            Some("\"/usr/bin/check_local\"")
        );
    }

    #[test]
    fn members_become_rules() {
        let mut def = ObjectDefinition::new("HostGroup", "linux");
        convert_members(&mut def, "web1, !db1, *");
        assert_eq!(def.assigns(), ["host.name == \"web1\"", "true"]);
        assert_eq!(def.ignores(), ["host.name == \"db1\""]);
        assert_eq!(def.attribute_count(), 0);
    }

    #[test]
    fn list_valued_elements_are_transformed() {
        let mapping = ObjectKind::Hostgroup.mapping();
        let mut def = ObjectDefinition::new("HostGroup", "all");
        apply_mapped(mapping, &mut def, "hostgroup_members", "groups", "linux, 2nd ,");

        let items = def.get("groups").and_then(|v| v.as_list()).unwrap();
        assert_eq!(items, ["\"linux\"", "2nd"]);
    }
}
