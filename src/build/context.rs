//! Build context containing configuration and state for a build.

use crate::build::aggregate::DuplicatePolicy;
use crate::config::CopyViewsConfig;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: CopyViewsConfig,
    /// Project root directory (where copy-views.toml is located)
    project_root: PathBuf,
    /// Whether duplicate graph indices are rejected
    strict: bool,
}

impl BuildContext {
    /// Create a new build context.
    ///
    /// # Arguments
    /// - `config` - The loaded configuration
    /// - `project_root` - The project root directory
    pub fn new(config: CopyViewsConfig, project_root: PathBuf) -> Self {
        let strict = config.resolve.strict;
        Self { config, project_root, strict }
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the manifest output directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Whether strict mode is enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Duplicate-index policy for this build's aggregate.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Overwrite
        }
    }

    /// Configured number of resolver workers, if any.
    pub fn jobs(&self) -> Option<usize> {
        self.config.resolve.jobs
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
