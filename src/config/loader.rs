//! Configuration loading and discovery for `copy-views.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{CopyViewsConfig, ProjectConfig, ResolveConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config filename searched for in the project tree.
pub const CONFIG_FILENAME: &str = "copy-views.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse copy-views.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Enable strict duplicate-index checking
    pub strict: Option<bool>,
    /// Number of resolver workers
    pub jobs: Option<usize>,
}

/// Find `copy-views.toml` by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find `copy-views.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a `copy-views.toml` file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. If no config file is found, returns a
/// default configuration.
pub fn load_config(path: Option<&Path>) -> Result<CopyViewsConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CopyViewsConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CopyViewsConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Create a default configuration when no `copy-views.toml` is found.
///
/// The project name is taken from the current directory name.
pub fn default_config() -> CopyViewsConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    CopyViewsConfig {
        project: ProjectConfig { name: project_name, out: PathBuf::from("build") },
        resolve: ResolveConfig::default(),
    }
}

/// Apply CLI overrides on top of a loaded configuration.
pub fn merge_cli_overrides(config: &mut CopyViewsConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(strict) = overrides.strict {
        config.resolve.strict = strict;
    }

    if let Some(jobs) = overrides.jobs {
        config.resolve.jobs = Some(jobs.max(1));
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}
