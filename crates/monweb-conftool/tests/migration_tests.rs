//! End-to-end conversion tests against the shared legacy fixtures

use monweb_conftool::*;
use monweb_test_utils::legacy::{linux_hostgroup, ping_command};
use pretty_assertions::assert_eq;

#[test]
fn hostgroup_renders_attributes_then_rules() {
    let def = convert(&linux_hostgroup()).unwrap();

    let expected = concat!(
        "object HostGroup \"linux\" {\n",
        "    display_name = \"Linux Servers\"\n",
        "    groups = [ \"\\\"all-servers\\\"\" ]\n",
        "    notes_url = \"https://wiki.example.com/linux\"\n",
        "    assign where host.name == \"web1\"\n",
        "    assign where host.name == \"web2\"\n",
        "    ignore where host.name == \"db1\"\n",
        "}\n",
        "\n",
    );
    assert_eq!(def.render(), expected);
}

#[test]
fn command_renders_plugin_dir_and_duration() {
    let def = convert(&ping_command()).unwrap();

    let expected = concat!(
        "object CheckCommand \"check_ping\" {\n",
        "    command = PluginDir + \"/check_ping -H $HOSTADDRESS$ -w $ARG1$ -c $ARG2$\"\n",
        "    timeout = 30s\n",
        "}\n",
        "\n",
    );
    assert_eq!(def.render(), expected);
}

#[test]
fn every_mapped_key_yields_one_attribute() {
    for kind in ObjectKind::ALL {
        let mapping = kind.mapping();
        for (legacy_key, new_key) in mapping.renames() {
            let legacy = LegacyObjectDefinition::new(kind.tag(), "probe")
                .with_attribute(*legacy_key, "value");
            let def = convert(&legacy).unwrap();

            assert_eq!(def.attribute_count(), 1, "{kind}.{legacy_key}");
            assert!(def.get(new_key).is_some(), "{kind}.{legacy_key}");
            assert!(def.assigns().is_empty() && def.ignores().is_empty());
        }
    }
}

#[test]
fn override_keys_never_fail() {
    for kind in ObjectKind::ALL {
        for key in kind.mapping().override_keys() {
            let legacy = LegacyObjectDefinition::new(kind.tag(), "probe").with_attribute(key, "x");
            assert!(convert(&legacy).is_ok(), "{kind}.{key}");
        }
    }
}

#[test]
fn unknown_key_is_reported_by_name() {
    let legacy = linux_hostgroup().with_attribute("realm", "eu");
    let err = convert(&legacy).unwrap_err();
    assert_eq!(err.attribute(), Some("realm"));
}

#[test]
fn numeric_and_text_scalars() {
    let render = |value: &str| {
        let legacy =
            LegacyObjectDefinition::new("command", "probe").with_attribute("timeout", value);
        convert(&legacy).unwrap().render()
    };

    assert!(render("30").contains("    timeout = 30\n"));
    assert!(render("30s").contains("    timeout = 30s\n"));
    assert!(render("PING").contains("    timeout = \"PING\"\n"));
}

#[test]
fn batch_from_yaml_document() {
    let yaml = r#"
- type: command
  name: check_ping
  attributes:
    command_name: check_ping
    command_line: $USER1$/check_ping
- type: contact
  name: admin
  attributes:
    contact_name: admin
- type: hostgroup
  name: all
  attributes:
    hostgroup_name: all
    members: "*"
"#;
    let objects = LegacyObjectDefinition::list_from_yaml(yaml).unwrap();
    let report = migrate_batch(&objects, &MigrateOptions::new());

    assert_eq!(report.definitions.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "admin");

    let text = report.render();
    assert!(text.contains("object CheckCommand \"check_ping\" {\n"));
    assert!(text.ends_with("    assign where true\n}\n\n"));
}

#[test]
fn list_valued_key_splits_and_quotes_twice() {
    let legacy = LegacyObjectDefinition::new("hostgroup", "web")
        .with_attribute("hostgroup_members", "a, b ,c");
    let def = convert(&legacy).unwrap();

    let stored = def.get("groups").and_then(AttributeValue::as_list).unwrap();
    assert_eq!(stored, ["\"a\"", "\"b\"", "\"c\""]);
    assert_eq!(split_comma("a, b ,c"), vec!["a", "b", "c"]);

    assert_eq!(
        def.render(),
        concat!(
            "object HostGroup \"web\" {\n",
            r#"    groups = [ "\"a\"", "\"b\"", "\"c\"" ]"#,
            "\n}\n\n",
        )
    );
}
