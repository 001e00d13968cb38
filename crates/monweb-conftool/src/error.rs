//! Error types for legacy object migration
//!
//! Both variants are fatal for the single object being converted; batch
//! callers decide whether to skip the object or abort the run.

/// Errors raised while converting one legacy object definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The legacy type tag has no new-generation counterpart
    #[error("cannot convert unknown object \"{name}\" of type \"{object_type}\"")]
    UnsupportedObjectType {
        /// Legacy type tag, e.g. `service`
        object_type: String,
        /// Identity of the offending object
        name: String,
    },

    /// A legacy attribute has neither an override nor a mapping entry
    #[error("cannot convert the \"{key}\" property of given legacy object: {object}")]
    UnmappedAttribute {
        /// Legacy attribute name
        key: String,
        /// Legacy-syntax dump of the whole object
        object: String,
    },
}

impl MigrationError {
    /// Create unsupported type error
    pub fn unsupported_type(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnsupportedObjectType {
            object_type: object_type.into(),
            name: name.into(),
        }
    }

    /// Create unmapped attribute error
    pub fn unmapped(key: impl Into<String>, object: impl Into<String>) -> Self {
        Self::UnmappedAttribute {
            key: key.into(),
            object: object.into(),
        }
    }

    /// Legacy attribute name for [`MigrationError::UnmappedAttribute`]
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::UnmappedAttribute { key, .. } => Some(key),
            Self::UnsupportedObjectType { .. } => None,
        }
    }
}

/// A type tag that names no supported object kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown object kind \"{0}\"")]
pub struct UnknownKindError(pub String);

/// Errors while loading legacy objects from a serialized document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_display() {
        let err = MigrationError::unsupported_type("service", "ping4");
        assert_eq!(
            err.to_string(),
            "cannot convert unknown object \"ping4\" of type \"service\""
        );
        assert_eq!(err.attribute(), None);
    }

    #[test]
    fn unmapped_attribute_names_key() {
        let err = MigrationError::unmapped("retain_status", "define command {\n}\n");
        assert_eq!(err.attribute(), Some("retain_status"));
        assert!(err.to_string().contains("\"retain_status\" property"));
    }
}
