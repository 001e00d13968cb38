//! Legacy → new-generation conversion
//!
//! [`convert`] handles a single object. [`migrate_batch`] drives many
//! objects and applies a [`BatchPolicy`] to per-object failures.

use tracing::{debug, warn};

use crate::definition::ObjectDefinition;
use crate::error::{MigrationError, MigrationResult};
use crate::kind::{apply_mapped, ObjectKind};
use crate::legacy::LegacyObjectDefinition;

/// Convert one legacy object definition
///
/// Attributes are visited in their original order. Override converters win
/// over the rename table; keys known to neither abort the conversion.
///
/// # Errors
/// - `MigrationError::UnsupportedObjectType` for unknown type tags
/// - `MigrationError::UnmappedAttribute` for keys without a rule
pub fn convert(legacy: &LegacyObjectDefinition) -> MigrationResult<ObjectDefinition> {
    let kind = ObjectKind::from_tag(legacy.definition_type()).ok_or_else(|| {
        MigrationError::unsupported_type(legacy.definition_type(), legacy.name())
    })?;
    let mapping = kind.mapping();
    let mut def = ObjectDefinition::new(kind.object_type(), legacy.name());

    for (key, value) in legacy.attributes() {
        if let Some(convert) = mapping.override_for(key) {
            convert(&mut def, value);
            continue;
        }
        let new_key = mapping
            .rename(key)
            .ok_or_else(|| MigrationError::unmapped(key, legacy.to_string()))?;
        apply_mapped(mapping, &mut def, key, new_key, value);
    }

    debug!(kind = %kind, name = legacy.name(), "converted legacy object");
    Ok(def)
}

/// What to do when one object of a batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Log the failure and continue with the next object
    #[default]
    SkipAndLog,

    /// Stop at the first failure
    FailFast,
}

/// Options for batch migration
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Failure policy
    pub policy: BatchPolicy,
}

impl MigrateOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With failure policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A failed object in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the object in the input
    pub index: usize,
    /// Legacy object name
    pub name: String,
    /// Why it failed
    pub error: MigrationError,
}

/// Outcome of a batch migration
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Converted definitions in input order
    pub definitions: Vec<ObjectDefinition>,
    /// Objects that could not be converted
    pub failures: Vec<BatchFailure>,
    /// Set when a fail-fast batch stopped early
    pub aborted: bool,
}

impl BatchReport {
    /// Whether every object converted
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render all converted definitions back to back
    #[must_use]
    pub fn render(&self) -> String {
        self.definitions.iter().map(ObjectDefinition::render).collect()
    }
}

/// Convert a batch of legacy objects
pub fn migrate_batch<'a, I>(objects: I, options: &MigrateOptions) -> BatchReport
where
    I: IntoIterator<Item = &'a LegacyObjectDefinition>,
{
    let mut report = BatchReport::default();

    for (index, legacy) in objects.into_iter().enumerate() {
        match convert(legacy) {
            Ok(def) => report.definitions.push(def),
            Err(error) => {
                warn!(index, name = legacy.name(), %error, "skipping legacy object");
                report.failures.push(BatchFailure {
                    index,
                    name: legacy.name().to_string(),
                    error,
                });
                if options.policy == BatchPolicy::FailFast {
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping() -> LegacyObjectDefinition {
        LegacyObjectDefinition::new("command", "check_ping")
            .with_attribute("command_name", "check_ping")
            .with_attribute("command_line", "$USER1$/check_ping -H $HOSTADDRESS$")
            .with_attribute("timeout", "30s")
    }

    #[test]
    fn convert_command() {
        let def = convert(&ping()).unwrap();
        assert_eq!(def.object_type(), "CheckCommand");
        assert_eq!(def.name(), "check_ping");
        assert_eq!(def.attribute_count(), 2);
        assert_eq!(def.get("timeout").and_then(|v| v.as_scalar()), Some("30s"));
    }

    #[test]
    fn unknown_type_fails() {
        let legacy = LegacyObjectDefinition::new("service", "ping4");
        let err = convert(&legacy).unwrap_err();
        assert_eq!(err, MigrationError::unsupported_type("service", "ping4"));
    }

    #[test]
    fn unmapped_attribute_fails_with_dump() {
        let legacy = ping().with_attribute("retain_status_information", "1");
        match convert(&legacy).unwrap_err() {
            MigrationError::UnmappedAttribute { key, object } => {
                assert_eq!(key, "retain_status_information");
                assert!(object.starts_with("define command {"));
                assert!(object.contains("retain_status_information\t1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn batch_skips_failures() {
        let objects = vec![
            ping(),
            LegacyObjectDefinition::new("service", "ping4"),
            LegacyObjectDefinition::new("hostgroup", "linux").with_attribute("alias", "Linux"),
        ];
        let report = migrate_batch(&objects, &MigrateOptions::new());

        assert_eq!(report.definitions.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(!report.aborted);
        assert!(!report.is_clean());
    }

    #[test]
    fn batch_fail_fast_stops() {
        let objects = vec![
            LegacyObjectDefinition::new("service", "ping4"),
            ping(),
        ];
        let options = MigrateOptions::new().with_policy(BatchPolicy::FailFast);
        let report = migrate_batch(&objects, &options);

        assert!(report.definitions.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(report.aborted);
    }
}
