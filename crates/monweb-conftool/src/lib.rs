//! Legacy object migration
//!
//! Converts legacy monitoring configuration objects (a type tag plus an
//! ordered attribute bag) into new-generation object definitions.
//!
//! # Core Concepts
//!
//! - [`LegacyObjectDefinition`]: parsed `define <type> { ... }` block
//! - [`ObjectKind`]: supported object kinds, each with its [`AttributeMapping`]
//! - [`ObjectDefinition`]: output block with attributes and assign/ignore rules
//! - [`convert`] / [`migrate_batch`]: single-object and batch conversion
//!
//! # Example
//!
//! ```rust
//! use monweb_conftool::{convert, LegacyObjectDefinition};
//!
//! let legacy = LegacyObjectDefinition::new("hostgroup", "linux")
//!     .with_attribute("hostgroup_name", "linux")
//!     .with_attribute("alias", "Linux Servers")
//!     .with_attribute("members", "web1,web2");
//!
//! let def = convert(&legacy).unwrap();
//! assert!(def.render().starts_with("object HostGroup \"linux\" {\n"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod definition;
mod error;
mod kind;
mod legacy;
mod migrator;
mod value;

// Re-exports
pub use definition::ObjectDefinition;
pub use error::{LoadError, MigrationError, MigrationResult, UnknownKindError};
pub use kind::{AttributeMapping, Converter, ObjectKind};
pub use legacy::LegacyObjectDefinition;
pub use migrator::{convert, migrate_batch, BatchFailure, BatchPolicy, BatchReport, MigrateOptions};
pub use value::{escape_legacy_string, is_leading_numeric, migrate_scalar, split_comma, AttributeValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
