//! Manifest writer.
//!
//! Materializes a [`ViewAggregate`] as the `copy-views-args` file consumed by
//! the asset-copy step. The file lists one glob per line in graph order:
//!
//! ```text
//! thing-foo/foo/*
//! thing-foo-plugin-bar/bar/*
//! ```
//!
//! Only application roots produce a manifest. For an app root the file is
//! always rewritten, even when empty, so its presence means the manifest
//! step ran.

use crate::build::aggregate::ViewAggregate;
use crate::package::PackageDescriptor;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest filename inside the output directory.
pub const MANIFEST_FILENAME: &str = "copy-views-args";

/// Error writing the manifest.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What [`write_manifest`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    /// Manifest written
    Written {
        /// Path of the manifest file
        path: PathBuf,
        /// Number of globs written
        entries: usize,
    },
    /// Root is not an application; nothing written
    Skipped,
}

impl ManifestOutcome {
    /// Whether a file was written.
    pub fn is_written(&self) -> bool {
        matches!(self, ManifestOutcome::Written { .. })
    }
}

/// Path of the manifest inside `out_dir`.
pub fn manifest_path(out_dir: &Path) -> PathBuf {
    out_dir.join(MANIFEST_FILENAME)
}

/// Write the manifest for `root` into `out_dir`.
///
/// Does nothing unless `root` is an app. Otherwise creates `out_dir` if
/// needed and (re)writes the manifest. Filesystem errors are returned as-is.
pub fn write_manifest(
    aggregate: &ViewAggregate,
    root: &PackageDescriptor,
    out_dir: &Path,
) -> Result<ManifestOutcome, ManifestError> {
    if !root.is_app() {
        return Ok(ManifestOutcome::Skipped);
    }

    let entries = aggregate.entries();
    let path = manifest_path(out_dir);

    fs::create_dir_all(out_dir)?;
    fs::write(&path, entries.join("\n"))?;

    Ok(ManifestOutcome::Written { path, entries: entries.len() })
}

/// Remove the manifest from `out_dir`.
///
/// Returns `Ok(true)` if a manifest was removed and `Ok(false)` if there was
/// none.
pub fn clean_manifest(out_dir: &Path) -> std::io::Result<bool> {
    let path = manifest_path(out_dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::BuildType;
    use tempfile::TempDir;

    fn pkg(name: &str, build_type: BuildType, views: Option<&str>) -> PackageDescriptor {
        let pkg = PackageDescriptor::new(name).with_build_type(build_type);
        match views {
            Some(v) => pkg.with_views(v),
            None => pkg,
        }
    }

    #[test]
    fn test_write_app_manifest() {
        let temp = TempDir::new().unwrap();
        let root = pkg("thing", BuildType::App, Some("foo"));
        let agg = ViewAggregate::new();
        agg.resolve(&root, ".", 0, &["thing"]).unwrap();

        let outcome = write_manifest(&agg, &root, temp.path()).unwrap();

        let path = temp.path().join(MANIFEST_FILENAME);
        assert_eq!(outcome, ManifestOutcome::Written { path: path.clone(), entries: 1 });
        assert_eq!(fs::read_to_string(path).unwrap(), "foo/*");
    }

    #[test]
    fn test_write_empty_manifest_for_app() {
        let temp = TempDir::new().unwrap();
        let root = pkg("thing", BuildType::App, None);
        let agg = ViewAggregate::new();
        agg.resolve(&root, ".", 0, &["thing"]).unwrap();

        let outcome = write_manifest(&agg, &root, temp.path()).unwrap();

        assert!(outcome.is_written());
        assert_eq!(fs::read_to_string(manifest_path(temp.path())).unwrap(), "");
    }

    #[test]
    fn test_skip_lib_root() {
        let temp = TempDir::new().unwrap();
        let root = pkg("thing", BuildType::Lib, Some("foo"));
        let agg = ViewAggregate::new();
        agg.resolve(&root, ".", 0, &["thing"]).unwrap();

        let outcome = write_manifest(&agg, &root, temp.path()).unwrap();

        assert_eq!(outcome, ManifestOutcome::Skipped);
        assert!(!manifest_path(temp.path()).exists());
    }

    #[test]
    fn test_skip_root_without_build_type() {
        let temp = TempDir::new().unwrap();
        let root = PackageDescriptor::new("thing");

        let outcome = write_manifest(&ViewAggregate::new(), &root, temp.path()).unwrap();

        assert!(!outcome.is_written());
        assert!(!manifest_path(temp.path()).exists());
    }

    #[test]
    fn test_write_creates_out_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested/build");
        let root = pkg("thing", BuildType::App, None);

        write_manifest(&ViewAggregate::new(), &root, &out).unwrap();

        assert!(manifest_path(&out).exists());
    }

    #[test]
    fn test_write_overwrites_previous_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(manifest_path(temp.path()), "stale/*\nolder/*").unwrap();
        let root = pkg("thing", BuildType::App, None);

        write_manifest(&ViewAggregate::new(), &root, temp.path()).unwrap();

        assert_eq!(fs::read_to_string(manifest_path(temp.path())).unwrap(), "");
    }

    #[test]
    fn test_write_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = pkg("thing", BuildType::App, Some("foo"));
        let agg = ViewAggregate::new();
        agg.resolve(&root, ".", 0, &["thing"]).unwrap();
        agg.resolve(&pkg("other", BuildType::Lib, Some("bar")), "other", 1, &["thing", "other"])
            .unwrap();

        write_manifest(&agg, &root, temp.path()).unwrap();
        let first = fs::read(manifest_path(temp.path())).unwrap();
        write_manifest(&agg, &root, temp.path()).unwrap();
        let second = fs::read(manifest_path(temp.path())).unwrap();

        assert_eq!(first, second);
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn test_write_surfaces_io_error() {
        let temp = TempDir::new().unwrap();
        // A regular file where the output directory should be
        let blocker = temp.path().join("build");
        fs::write(&blocker, "not a directory").unwrap();
        let root = pkg("thing", BuildType::App, None);

        let err = write_manifest(&ViewAggregate::new(), &root, &blocker).unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }

    #[test]
    fn test_clean_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(manifest_path(temp.path()), "foo/*").unwrap();

        assert!(clean_manifest(temp.path()).unwrap());
        assert!(!manifest_path(temp.path()).exists());
        assert!(!clean_manifest(temp.path()).unwrap());
    }
}
