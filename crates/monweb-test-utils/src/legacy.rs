//! Legacy object fixtures

use monweb_conftool::LegacyObjectDefinition;

/// `define command { command_name check_ping ... }`
pub fn ping_command() -> LegacyObjectDefinition {
    LegacyObjectDefinition::new("command", "check_ping")
        .with_attribute("command_name", "check_ping")
        .with_attribute(
            "command_line",
            "$USER1$/check_ping -H $HOSTADDRESS$ -w $ARG1$ -c $ARG2$",
        )
        .with_attribute("timeout", "30s")
}

/// Hostgroup with a rename, a list-valued key and mixed member rules
pub fn linux_hostgroup() -> LegacyObjectDefinition {
    LegacyObjectDefinition::new("hostgroup", "linux")
        .with_attribute("hostgroup_name", "linux")
        .with_attribute("alias", "Linux Servers")
        .with_attribute("members", "web1, web2, !db1")
        .with_attribute("hostgroup_members", "all-servers")
        .with_attribute("notes_url", "https://wiki.example.com/linux")
}

/// Definition of a type no mapping exists for
pub fn admin_contact() -> LegacyObjectDefinition {
    LegacyObjectDefinition::new("contact", "admin").with_attribute("contact_name", "admin")
}
