//! Configuration schema types for `copy-views.toml`
//!
//! Defines the structure and validation rules for project configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Manifest output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// Resolve phase settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Reject two packages sharing one graph index instead of overwriting
    #[serde(default)]
    pub strict: bool,
    /// Number of resolver workers (defaults to available parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Root configuration structure for `copy-views.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyViewsConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Resolve settings
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "resolve.jobs")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "copy-views.toml: '{}' {}", self.field, self.message)
    }
}

impl CopyViewsConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.project.out.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "project.out".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.resolve.jobs == Some(0) {
            errors.push(ConfigValidationError {
                field: "resolve.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }
}
