//! Configuration module for the copy-views build step
//!
//! Provides types and parsing for `copy-views.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, CliOverrides, ConfigError};
pub use schema::*;
