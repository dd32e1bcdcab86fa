//! Index-keyed aggregate of views globs.
//!
//! Every package in the build graph is resolved against a shared
//! [`ViewAggregate`]. Each resolve touches only the slot for its own graph
//! position, so resolves may run on any number of threads and finish in any
//! order; the manifest is always read back in ascending index order.
//!
//! Packages without a views directory leave their slot empty. Empty slots
//! are holes, never empty strings.

use crate::package::PackageDescriptor;
use crate::views::glob_entry;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How to treat a resolve into a slot another package already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Last writer wins
    #[default]
    Overwrite,
    /// Fail with [`ResolveError::DuplicateIndex`]
    Reject,
}

/// Error resolving a package into the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// Two different packages were given the same graph position
    #[error("Index {index} already holds '{existing}', cannot assign it to '{incoming}'")]
    DuplicateIndex { index: usize, existing: String, incoming: String },
}

/// A populated slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    /// Package that contributed the entry
    pub package: String,
    /// Normalized glob, always ending in `/*`
    pub glob: String,
    /// Path from the root to the package; recorded, never used for ordering
    pub dependency_chain: Vec<String>,
}

/// What a single resolve did to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Stored glob, `None` when the package declares no views directory
    pub glob: Option<String>,
    /// Entry previously held by the slot, if the resolve overwrote one
    pub replaced: Option<ViewEntry>,
}

/// Aggregated views globs for one build.
#[derive(Debug, Default)]
pub struct ViewAggregate {
    slots: Mutex<BTreeMap<usize, ViewEntry>>,
    policy: DuplicatePolicy,
}

impl ViewAggregate {
    /// Create an empty aggregate that overwrites duplicate indices.
    pub const fn new() -> Self {
        Self { slots: Mutex::new(BTreeMap::new()), policy: DuplicatePolicy::Overwrite }
    }

    /// Create an empty aggregate with the given duplicate policy.
    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { slots: Mutex::new(BTreeMap::new()), policy }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, ViewEntry>> {
        // Slot writes are single inserts, so a poisoned map is still whole.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve one package into the slot at `index`.
    ///
    /// Returns the stored glob, or `None` when the package declares no views
    /// directory (in which case nothing is stored). `dependency_chain` is
    /// kept with the entry but has no effect on the glob or its order.
    pub fn resolve<S: AsRef<str>>(
        &self,
        package: &PackageDescriptor,
        base_path: &str,
        index: usize,
        dependency_chain: &[S],
    ) -> Result<Option<String>, ResolveError> {
        self.resolve_entry(package, base_path, index, dependency_chain).map(|r| r.glob)
    }

    /// Like [`resolve`](Self::resolve), but also hands back the entry the
    /// slot held before, so callers can report overwrites.
    pub fn resolve_entry<S: AsRef<str>>(
        &self,
        package: &PackageDescriptor,
        base_path: &str,
        index: usize,
        dependency_chain: &[S],
    ) -> Result<Resolution, ResolveError> {
        let views = match package.views() {
            Some(views) => views,
            None => return Ok(Resolution::default()),
        };

        let glob = glob_entry(base_path, views);
        let entry = ViewEntry {
            package: package.name.clone(),
            glob: glob.clone(),
            dependency_chain: dependency_chain.iter().map(|s| s.as_ref().to_string()).collect(),
        };

        let mut slots = self.lock();
        if self.policy == DuplicatePolicy::Reject {
            if let Some(existing) = slots.get(&index) {
                if existing.package != package.name {
                    return Err(ResolveError::DuplicateIndex {
                        index,
                        existing: existing.package.clone(),
                        incoming: package.name.clone(),
                    });
                }
            }
        }
        let replaced = slots.insert(index, entry);

        Ok(Resolution { glob: Some(glob), replaced })
    }

    /// The entry stored at `index`, if any.
    pub fn get(&self, index: usize) -> Option<ViewEntry> {
        self.lock().get(&index).cloned()
    }

    /// All populated globs in ascending index order.
    pub fn entries(&self) -> Vec<String> {
        self.lock().values().map(|e| e.glob.clone()).collect()
    }

    /// Manifest contents: populated globs joined by newlines.
    ///
    /// Empty when nothing is populated. There is no trailing newline.
    pub fn render(&self) -> String {
        self.entries().join("\n")
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every entry, returning the aggregate to its initial state.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
