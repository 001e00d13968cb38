//! Backend capabilities

use std::fmt::{self, Display, Formatter};

/// A behavioral contract a backend may implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Rows can be queried and counted
    Selectable,
    /// Rows can be inserted
    Extensible,
    /// Rows can be updated
    Updatable,
    /// Rows can be deleted
    Reducible,
}

impl Capability {
    /// Every capability
    pub const ALL: [Capability; 4] = [
        Capability::Selectable,
        Capability::Extensible,
        Capability::Updatable,
        Capability::Reducible,
    ];

    /// Lower-case name used in messages
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selectable => "selectable",
            Self::Extensible => "extensible",
            Self::Updatable => "updatable",
            Self::Reducible => "reducible",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
