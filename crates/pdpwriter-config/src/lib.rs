//! # pdpwriter Config
//!
//! Configuration for pdpwriter comes from two layers:
//!
//! - a defaults template (`defaults.toml`, embedded at build time),
//! - user settings persisted in a small key-value store.
//!
//! [`ConfigResolver`] merges both into a [`Config`] each time it is asked.

mod error;
mod loader;
mod resolver;
mod schema;
mod store;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, ConfigSource};
pub use schema::*;
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore, StoredSettings};
