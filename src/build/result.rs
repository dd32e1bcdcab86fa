//! Build result types.
//!
//! Contains types for representing the outcome of a resolve/write cycle.

use crate::build::writer::ManifestOutcome;
use std::time::Duration;

/// Outcome of resolving a single package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Package contributed a glob
    Contributed(String),
    /// Package declares no views directory
    Skipped,
    /// Resolve failed with error
    Failed(String),
}

impl ResolveStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, ResolveStatus::Contributed(_) | ResolveStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, ResolveStatus::Failed(_))
    }
}

impl std::fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveStatus::Contributed(glob) => write!(f, "contributed {}", glob),
            ResolveStatus::Skipped => write!(f, "skipped"),
            ResolveStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of resolving a single package.
#[derive(Debug, Clone)]
pub struct PackageResult {
    /// Package name
    pub package: String,
    /// Graph index the package was resolved at
    pub index: usize,
    /// Resolve status
    pub status: ResolveStatus,
    /// Resolve duration
    pub duration: Duration,
}

impl PackageResult {
    /// Create a result from a resolve outcome.
    pub fn new(package: String, index: usize, status: ResolveStatus, duration: Duration) -> Self {
        Self { package, index, status, duration }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete resolve/write cycle.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each package, in graph order
    pub packages: Vec<PackageResult>,
    /// What the writer did, once the resolve phase succeeded
    pub manifest: Option<ManifestOutcome>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package result.
    pub fn add_result(&mut self, result: PackageResult) {
        self.packages.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Number of packages that contributed a glob.
    pub fn contributed_count(&self) -> usize {
        self.packages.iter().filter(|r| matches!(r.status, ResolveStatus::Contributed(_))).count()
    }

    /// Number of packages without views.
    pub fn skipped_count(&self) -> usize {
        self.packages.iter().filter(|r| matches!(r.status, ResolveStatus::Skipped)).count()
    }

    /// Number of packages that failed to resolve.
    pub fn failed_count(&self) -> usize {
        self.packages.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if every package resolved.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Failed package results.
    pub fn failures(&self) -> Vec<&PackageResult> {
        self.packages.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let contributed = self.contributed_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.packages.len();

        if failed > 0 {
            lines.push(format!(
                "Resolve failed: {} contributed, {} without views, {} failed ({} total)",
                contributed, skipped, failed, total
            ));
            for package in self.failures() {
                lines.push(format!(
                    "  - {} [{}]: {}",
                    package.package, package.index, package.status
                ));
            }
        } else {
            lines.push(format!(
                "Resolved {} packages: {} contributed, {} without views in {:?}",
                total, contributed, skipped, self.total_duration
            ));
        }

        match &self.manifest {
            Some(ManifestOutcome::Written { path, entries }) => {
                lines.push(format!("Wrote {} ({} entries)", path.display(), entries));
            }
            Some(ManifestOutcome::Skipped) => {
                lines.push("Root is not an app; no manifest written".to_string());
            }
            None => {}
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn result(name: &str, index: usize, status: ResolveStatus) -> PackageResult {
        PackageResult::new(name.to_string(), index, status, Duration::ZERO)
    }

    #[test]
    fn test_resolve_status_display() {
        assert_eq!(
            ResolveStatus::Contributed("foo/*".to_string()).to_string(),
            "contributed foo/*"
        );
        assert_eq!(ResolveStatus::Skipped.to_string(), "skipped");
        assert_eq!(ResolveStatus::Failed("error".to_string()).to_string(), "failed: error");
    }

    #[test]
    fn test_resolve_status_is_success() {
        assert!(ResolveStatus::Contributed("a/*".to_string()).is_success());
        assert!(ResolveStatus::Skipped.is_success());
        assert!(!ResolveStatus::Failed("error".to_string()).is_success());
    }

    #[test]
    fn test_build_result_counts() {
        let mut build = BuildResult::new();
        build.add_result(result("a", 0, ResolveStatus::Contributed("a/*".to_string())));
        build.add_result(result("b", 1, ResolveStatus::Skipped));
        build.add_result(result("c", 2, ResolveStatus::Failed("dup".to_string())));

        assert_eq!(build.contributed_count(), 1);
        assert_eq!(build.skipped_count(), 1);
        assert_eq!(build.failed_count(), 1);
        assert!(!build.is_success());
        assert_eq!(build.failures()[0].package, "c");
    }

    #[test]
    fn test_build_result_summary_success() {
        let mut build = BuildResult::new();
        build.add_result(result("a", 0, ResolveStatus::Contributed("a/*".to_string())));
        build.manifest = Some(ManifestOutcome::Written {
            path: PathBuf::from("build/copy-views-args"),
            entries: 1,
        });

        let summary = build.with_duration(Duration::from_millis(3)).summary();
        assert!(summary.contains("Resolved 1 packages"));
        assert!(summary.contains("copy-views-args (1 entries)"));
    }

    #[test]
    fn test_build_result_summary_failure() {
        let mut build = BuildResult::new();
        build.add_result(result("c", 4, ResolveStatus::Failed("duplicate".to_string())));

        let summary = build.summary();
        assert!(summary.contains("Resolve failed"));
        assert!(summary.contains("c [4]: failed: duplicate"));
    }

    #[test]
    fn test_build_result_summary_skipped_manifest() {
        let mut build = BuildResult::new();
        build.manifest = Some(ManifestOutcome::Skipped);
        assert!(build.summary().contains("no manifest written"));
    }
}
