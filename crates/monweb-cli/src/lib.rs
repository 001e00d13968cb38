//! conftool library
//!
//! Input loading, the mapping listing and batch summaries behind the
//! `conftool` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use monweb_conftool::{BatchReport, LegacyObjectDefinition, ObjectKind};

/// Serialization of a legacy object list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse a legacy object list
///
/// # Errors
/// Returns error if the document does not match the format
pub fn parse_objects(input: &str, format: InputFormat) -> Result<Vec<LegacyObjectDefinition>> {
    let objects = match format {
        InputFormat::Json => LegacyObjectDefinition::list_from_json(input)?,
        InputFormat::Yaml => LegacyObjectDefinition::list_from_yaml(input)?,
    };
    Ok(objects)
}

/// Read and parse a legacy object list from disk
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_objects(path: &Path) -> Result<Vec<LegacyObjectDefinition>> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_objects(&input, InputFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// One-line summary plus one line per failed object
#[must_use]
pub fn summarize(report: &BatchReport) -> String {
    let mut out = format!(
        "{} converted, {} failed",
        report.definitions.len(),
        report.failures.len()
    );
    if report.aborted {
        out.push_str(" (aborted)");
    }
    out.push('\n');
    for failure in &report.failures {
        let _ = writeln!(out, "  #{} {}: {}", failure.index, failure.name, failure.error);
    }
    out
}

/// Attribute tables of every supported kind
#[must_use]
pub fn render_mappings() -> String {
    let mut out = String::new();
    for kind in ObjectKind::ALL {
        let mapping = kind.mapping();
        let _ = writeln!(out, "{kind} -> {}", kind.object_type());
        for (legacy, new) in mapping.renames() {
            let list = if mapping.is_list_valued(legacy) { " (list)" } else { "" };
            let _ = writeln!(out, "  {legacy} -> {new}{list}");
        }
        for key in mapping.override_keys() {
            let _ = writeln!(out, "  {key} (converted)");
        }
    }
    out
}
