//! Voice catalog management.

pub mod catalog;

pub use catalog::{BUILTIN_VOICES, CatalogSource, VoiceCatalog};
