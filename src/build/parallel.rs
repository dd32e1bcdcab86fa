//! Parallel resolve phase followed by the manifest write.
//!
//! # How It Works
//!
//! 1. Graph indices are checked for collisions before any worker starts
//! 2. Every package in the graph is resolved into one [`ViewAggregate`] on a
//!    worker pool; resolves finish in whatever order the pool runs them
//! 3. The pool is joined before anything is written
//! 4. If any resolve failed the whole build fails and nothing is written
//! 5. Otherwise the manifest is written for the graph's root package
//!
//! The manifest order comes from graph indices only, so the result is the
//! same for any number of workers.
//!
//! # Example
//!
//! ```ignore
//! use copy_views::build::{BuildContext, BuildGraph, ParallelResolve};
//!
//! let graph = BuildGraph::load(Path::new("graph.json"))?;
//! let result = ParallelResolve::new(context).with_jobs(4).run(&graph)?;
//! println!("{}", result.summary());
//! ```

use crate::build::aggregate::{Resolution, ViewAggregate};
use crate::build::context::BuildContext;
use crate::build::graph::{BuildGraph, GraphError, GraphNode};
use crate::build::progress::{NullProgress, ProgressEvent, ProgressReporter};
use crate::build::result::{BuildResult, PackageResult, ResolveStatus};
use crate::build::writer::{write_manifest, ManifestError, ManifestOutcome};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Error during a build.
#[derive(Debug)]
pub enum BuildError {
    /// Build graph error
    Graph(GraphError),
    /// Manifest write error
    Manifest(ManifestError),
    /// One or more packages failed to resolve
    ResolvePhase(Vec<String>),
    /// Generic build error
    Build(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Graph(e) => write!(f, "Graph error: {}", e),
            BuildError::Manifest(e) => write!(f, "Manifest error: {}", e),
            BuildError::ResolvePhase(failures) => {
                write!(f, "{} package(s) failed to resolve", failures.len())?;
                for failure in failures {
                    write!(f, "\n  - {}", failure)?;
                }
                Ok(())
            }
            BuildError::Build(e) => write!(f, "Build error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<GraphError> for BuildError {
    fn from(e: GraphError) -> Self {
        BuildError::Graph(e)
    }
}

impl From<ManifestError> for BuildError {
    fn from(e: ManifestError) -> Self {
        BuildError::Manifest(e)
    }
}

/// Default number of parallel jobs (uses available parallelism).
fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Parallel resolve-then-write executor.
pub struct ParallelResolve {
    /// Build context
    context: BuildContext,
    /// Number of resolver workers
    jobs: usize,
    /// Resolve only, never write the manifest
    dry_run: bool,
    /// Progress sink
    reporter: Arc<dyn ProgressReporter>,
}

impl ParallelResolve {
    /// Create a new executor.
    ///
    /// Uses the configured job count, or the available parallelism.
    pub fn new(context: BuildContext) -> Self {
        let jobs = context.jobs().unwrap_or_else(default_jobs).max(1);
        Self { context, jobs, dry_run: false, reporter: Arc::new(NullProgress::new()) }
    }

    /// Set the number of parallel jobs.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set dry-run mode (resolve but don't write).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Get the number of parallel jobs.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run a full cycle on a fresh aggregate.
    pub fn run(&self, graph: &BuildGraph) -> Result<BuildResult, BuildError> {
        let aggregate = ViewAggregate::with_policy(self.context.duplicate_policy());
        self.run_with(graph, &aggregate)
    }

    /// Run a full cycle against a caller-owned aggregate.
    ///
    /// The aggregate is not cleared first, so entries already present are
    /// kept. A node landing on a slot held by another package overwrites it
    /// with a warning, or fails under [`DuplicatePolicy::Reject`].
    ///
    /// [`DuplicatePolicy::Reject`]: crate::build::aggregate::DuplicatePolicy::Reject
    pub fn run_with(
        &self,
        graph: &BuildGraph,
        aggregate: &ViewAggregate,
    ) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let root = graph.root()?;

        let mut result = BuildResult::new();
        for package_result in self.resolve_all(graph, aggregate)? {
            result.add_result(package_result);
        }

        if !result.is_success() {
            self.report_completed(&result, start);
            let failures = result
                .failures()
                .iter()
                .map(|r| format!("{} [{}]: {}", r.package, r.index, r.status))
                .collect();
            return Err(BuildError::ResolvePhase(failures));
        }

        if !self.dry_run {
            let outcome = match write_manifest(aggregate, root, &self.context.out_dir()) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.reporter.report(ProgressEvent::Error {
                        package: Some(root.name.clone()),
                        message: e.to_string(),
                    });
                    return Err(e.into());
                }
            };
            match &outcome {
                ManifestOutcome::Written { path, entries } => {
                    self.reporter.report(ProgressEvent::ManifestWritten {
                        path: path.display().to_string(),
                        entries: *entries,
                    });
                }
                ManifestOutcome::Skipped => {
                    self.reporter
                        .report(ProgressEvent::ManifestSkipped { root: root.name.clone() });
                }
            }
            result.manifest = Some(outcome);
        }

        result.total_duration = start.elapsed();
        self.report_completed(&result, start);
        Ok(result)
    }

    /// Resolve every node and wait for all of them.
    ///
    /// Results come back in graph order whatever order they finished in.
    fn resolve_all(
        &self,
        graph: &BuildGraph,
        aggregate: &ViewAggregate,
    ) -> Result<Vec<PackageResult>, BuildError> {
        let nodes = graph.indexed()?;

        self.reporter.report(ProgressEvent::ResolveStarted {
            total_packages: nodes.len(),
            workers: self.jobs.min(nodes.len().max(1)),
        });

        if self.jobs == 1 || nodes.len() <= 1 {
            return Ok(nodes
                .iter()
                .map(|(index, node)| self.resolve_node(aggregate, *index, node))
                .collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.min(nodes.len()))
            .build()
            .map_err(|e| BuildError::Build(format!("Failed to start resolver pool: {}", e)))?;

        Ok(pool.install(|| {
            nodes
                .par_iter()
                .map(|(index, node)| self.resolve_node(aggregate, *index, node))
                .collect()
        }))
    }

    /// Resolve a single node into the aggregate.
    fn resolve_node(
        &self,
        aggregate: &ViewAggregate,
        index: usize,
        node: &GraphNode,
    ) -> PackageResult {
        let start = Instant::now();

        let resolved =
            aggregate.resolve_entry(&node.package, &node.base_path, index, node.chain.as_slice());
        let status = match resolved {
            Ok(Resolution { glob, replaced }) => {
                if let Some(previous) = replaced.filter(|e| e.package != node.package.name) {
                    self.reporter.report(ProgressEvent::Warning {
                        package: Some(node.package.name.clone()),
                        message: format!(
                            "index {} already held '{}'; overwritten",
                            index, previous.package
                        ),
                    });
                }
                match glob {
                    Some(glob) => ResolveStatus::Contributed(glob),
                    None => ResolveStatus::Skipped,
                }
            }
            Err(e) => ResolveStatus::Failed(e.to_string()),
        };

        let duration = start.elapsed();
        self.reporter.report(ProgressEvent::PackageResolved {
            package: node.package.name.clone(),
            index,
            status: status.clone(),
            duration_ms: duration.as_millis() as u64,
        });

        PackageResult::new(node.package.name.clone(), index, status, duration)
    }

    fn report_completed(&self, result: &BuildResult, start: Instant) {
        self.reporter.report(ProgressEvent::BuildCompleted {
            success: result.is_success(),
            duration_ms: start.elapsed().as_millis() as u64,
            contributed: result.contributed_count(),
            skipped: result.skipped_count(),
            failed: result.failed_count(),
        });
    }
}
