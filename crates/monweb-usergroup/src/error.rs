//! Error types for the user group console
//!
//! [`ConsoleError`] is what a controller action returns; the HTTP layer maps
//! it to a status code via [`ConsoleError::status_code`].

use crate::capability::Capability;
use crate::request::Method;

/// Errors raised by backend implementations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Select or count failed
    #[error("query failed: {0}")]
    Query(String),

    /// Insert, update or delete failed
    #[error("{0}")]
    Statement(String),

    /// A row is missing a column or carries an unparsable value
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// No constructor registered for the configured backend type
    #[error("unknown user group backend type \"{0}\"")]
    UnknownType(String),

    /// Backend section is unusable
    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by controller actions
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Named backend has no configuration section
    #[error("user group backend \"{0}\" not found")]
    BackendNotFound(String),

    /// Group has no matching row
    #[error("group \"{0}\" not found")]
    GroupNotFound(String),

    /// Backend lacks the capability the action needs
    #[error("user group backend \"{backend}\" is not {capability}")]
    UnsupportedCapability {
        backend: String,
        capability: Capability,
    },

    /// Required request parameter absent or empty
    #[error("required parameter '{0}' is missing")]
    MissingParameter(String),

    /// Action called with the wrong HTTP method
    #[error("method {actual} is not allowed, expected {expected}")]
    MethodNotAllowed { expected: Method, actual: Method },

    /// Backend failure outside a notification-tolerant path
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl ConsoleError {
    /// Create unsupported capability error
    pub fn unsupported(backend: impl Into<String>, capability: Capability) -> Self {
        Self::UnsupportedCapability {
            backend: backend.into(),
            capability,
        }
    }

    /// Create missing parameter error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Whether the error is a not-found condition
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BackendNotFound(_) | Self::GroupNotFound(_))
    }

    /// HTTP status code the web layer should answer with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BackendNotFound(_) | Self::GroupNotFound(_) => 404,
            Self::UnsupportedCapability { .. } | Self::MissingParameter(_) => 400,
            Self::MethodNotAllowed { .. } => 405,
            Self::Backend(_) => 500,
        }
    }
}

/// Result type alias for controller actions
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_capability_names_capability() {
        let err = ConsoleError::unsupported("ldap", Capability::Reducible);
        assert_eq!(err.to_string(), "user group backend \"ldap\" is not reducible");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ConsoleError::BackendNotFound("x".into()).status_code(), 404);
        let err = ConsoleError::GroupNotFound("admins".into());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "group \"admins\" not found");
    }

    #[test]
    fn method_and_backend_codes() {
        let err = ConsoleError::MethodNotAllowed {
            expected: Method::Post,
            actual: Method::Get,
        };
        assert_eq!(err.status_code(), 405);

        let err: ConsoleError = BackendError::Query("timeout".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_not_found());
    }
}
