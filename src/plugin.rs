//! Process-wide resolver/writer entry points.
//!
//! Build hosts that drive plugins through free functions share one
//! aggregate per process. Call [`reset`] between builds. Code that owns its
//! build should create a [`ViewAggregate`] instead, which also allows
//! several builds in one process.

use crate::build::aggregate::{ResolveError, ViewAggregate};
use crate::build::writer::{write_manifest, ManifestError, ManifestOutcome};
use crate::package::PackageDescriptor;
use std::path::Path;

static AGGREGATE: ViewAggregate = ViewAggregate::new();

/// The shared aggregate.
pub fn aggregate() -> &'static ViewAggregate {
    &AGGREGATE
}

/// Resolve `package` at graph position `index` into the shared aggregate.
///
/// The shared aggregate overwrites duplicate indices, so this never fails in
/// practice.
pub fn resolver<S: AsRef<str>>(
    package: &PackageDescriptor,
    base_path: &str,
    index: usize,
    dependency_chain: &[S],
) -> Result<(), ResolveError> {
    AGGREGATE.resolve(package, base_path, index, dependency_chain)?;
    Ok(())
}

/// Write the shared aggregate's manifest for `root` into `out_dir`.
pub fn writer(
    root: &PackageDescriptor,
    out_dir: &Path,
) -> Result<ManifestOutcome, ManifestError> {
    write_manifest(&AGGREGATE, root, out_dir)
}

/// Empty the shared aggregate.
pub fn reset() {
    AGGREGATE.clear();
}
