//! Loading and reporting behind the conftool binary

use std::io::Write;
use std::path::Path;

use monweb_cli::*;
use monweb_conftool::{migrate_batch, BatchPolicy, MigrateOptions};
use monweb_test_utils::legacy::{admin_contact, linux_hostgroup, ping_command};
use pretty_assertions::assert_eq;

#[test]
fn format_follows_extension() {
    assert_eq!(InputFormat::from_path(Path::new("objects.json")), InputFormat::Json);
    assert_eq!(InputFormat::from_path(Path::new("objects.JSON")), InputFormat::Json);
    assert_eq!(InputFormat::from_path(Path::new("objects.yml")), InputFormat::Yaml);
    assert_eq!(InputFormat::from_path(Path::new("objects")), InputFormat::Yaml);
}

#[test]
fn loads_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[{{"type": "command", "name": "check_ping", "attributes": {{"timeout": "30"}}}}]"#
    )
    .unwrap();

    let objects = load_objects(file.path()).unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].attribute("timeout"), Some("30"));
}

#[test]
fn parse_errors_name_the_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "not json").unwrap();

    let err = load_objects(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse "));
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_objects(Path::new("/nonexistent/objects.yml")).is_err());
}

#[test]
fn summary_lists_failures() {
    let objects = vec![ping_command(), admin_contact(), linux_hostgroup()];

    let report = migrate_batch(&objects, &MigrateOptions::new());
    assert_eq!(
        summarize(&report),
        "2 converted, 1 failed\n  #1 admin: cannot convert unknown object \"admin\" of type \"contact\"\n"
    );

    let report = migrate_batch(
        &objects,
        &MigrateOptions::new().with_policy(BatchPolicy::FailFast),
    );
    assert!(summarize(&report).starts_with("1 converted, 1 failed (aborted)\n"));
}

#[test]
fn mappings_cover_every_kind() {
    let text = render_mappings();
    assert!(text.starts_with("command -> CheckCommand\n"));
    assert!(text.contains("  command_line (converted)\n"));
    assert!(text.contains("hostgroup -> HostGroup\n"));
    assert!(text.contains("  hostgroup_members -> groups (list)\n"));
    assert!(text.contains("  members (converted)\n"));
}
