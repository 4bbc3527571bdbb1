//! Configuration loader and schema types.
//!
//! This module exposes the settings that tune the playback engine and its
//! adapters, and helpers to resolve where they (and the session) live on disk.

mod load;
mod schema;

pub use load::{default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
