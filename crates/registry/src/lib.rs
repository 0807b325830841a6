//! Registry crate holding the console's command catalog.
//!
//! The catalog is compiled in: sections of immutable [`Command`] descriptors
//! covering the remote administration API. The crate also owns the shared
//! map-name catalog consumed by map selectors.

pub mod catalog;
pub mod maps;
pub mod models;

pub use hllrcon_types::{Command, CommandId, Field, FieldKind, Section};
pub use maps::{MapCatalog, parse_map_list};
pub use models::{CommandRegistry, RegistryError};
