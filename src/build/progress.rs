//! Build progress reporting.
//!
//! The resolve and write operations themselves never log; the orchestration
//! in [`crate::build::parallel`] reports what happened through a
//! [`ProgressReporter`]. Console (optionally coloured) and JSON-lines
//! reporters are provided.
//!
//! # Example
//!
//! ```ignore
//! use copy_views::build::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//!
//! let reporter = ConsoleProgress::new().with_verbose(true);
//! reporter.report(ProgressEvent::ResolveStarted { total_packages: 2, workers: 2 });
//! ```

use crate::build::result::ResolveStatus;
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Events that can be reported during a build.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Resolve phase started
    ResolveStarted {
        /// Number of packages in the graph
        total_packages: usize,
        /// Number of resolver workers
        workers: usize,
    },
    /// A package finished resolving
    PackageResolved {
        /// Package name
        package: String,
        /// Graph index
        index: usize,
        /// Resolve status
        status: ResolveStatus,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Manifest written for an app root
    ManifestWritten {
        /// Manifest path
        path: String,
        /// Number of globs written
        entries: usize,
    },
    /// Root is not an app, no manifest written
    ManifestSkipped {
        /// Root package name
        root: String,
    },
    /// Whole build finished
    BuildCompleted {
        /// Whether the build succeeded
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Packages that contributed a glob
        contributed: usize,
        /// Packages without views
        skipped: usize,
        /// Packages that failed to resolve
        failed: usize,
    },
    /// A warning was generated
    Warning {
        /// Package that generated the warning (if applicable)
        package: Option<String>,
        /// Warning message
        message: String,
    },
    /// An error occurred
    Error {
        /// Package that generated the error (if applicable)
        package: Option<String>,
        /// Error message
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show per-package lines
    verbose: bool,
    /// Packages resolved so far
    current: AtomicUsize,
    /// Packages in the graph
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter writing to stderr.
    ///
    /// Colors are enabled when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ResolveStarted { total_packages, workers } => {
                self.total.store(total_packages, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                self.writeln(&format!(
                    "{} Resolving {} package{} ({} worker{})...",
                    self.cyan("[views]"),
                    total_packages,
                    if total_packages == 1 { "" } else { "s" },
                    workers,
                    if workers == 1 { "" } else { "s" }
                ));
            }
            ProgressEvent::PackageResolved { package, index, status, duration_ms } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);

                // Failures are always shown, the rest only when verbose
                if !self.verbose && !status.is_failure() {
                    return;
                }

                let detail = match &status {
                    ResolveStatus::Contributed(glob) => format!("{} {}", self.green("ok"), glob),
                    ResolveStatus::Skipped => self.yellow("no views"),
                    ResolveStatus::Failed(_) => self.red("FAILED"),
                };

                self.writeln(&format!(
                    "{} [{}/{}] #{} {} {} ({})",
                    self.cyan("[views]"),
                    current,
                    total,
                    index,
                    package,
                    detail,
                    format_duration(duration_ms)
                ));

                if let ResolveStatus::Failed(err) = status {
                    self.writeln(&format!("        {}", self.red(&err)));
                }
            }
            ProgressEvent::ManifestWritten { path, entries } => {
                self.writeln(&format!(
                    "{} Wrote {} ({} entr{})",
                    self.green("[write]"),
                    path,
                    entries,
                    if entries == 1 { "y" } else { "ies" }
                ));
            }
            ProgressEvent::ManifestSkipped { root } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {} is not an app, no manifest written",
                        self.yellow("[write]"),
                        root
                    ));
                }
            }
            ProgressEvent::BuildCompleted {
                success,
                duration_ms,
                contributed,
                skipped,
                failed,
            } => {
                if success {
                    self.writeln(&format!(
                        "{} {} contributed, {} without views in {}",
                        self.green("[done]"),
                        contributed,
                        skipped,
                        format_duration(duration_ms)
                    ));
                } else {
                    self.writeln(&format!(
                        "{} Resolve failed: {} {} in {}",
                        self.red("[error]"),
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        format_duration(duration_ms)
                    ));
                }
            }
            ProgressEvent::Warning { package, message } => {
                let prefix = package.map(|p| format!("{}: ", p)).unwrap_or_default();
                self.writeln(&format!("{} {}{}", self.yellow("[warn]"), prefix, message));
            }
            ProgressEvent::Error { package, message } => {
                let prefix = package.map(|p| format!("{}: ", p)).unwrap_or_default();
                self.writeln(&format!("{} {}{}", self.red("[error]"), prefix, message));
            }
        }
    }
}

/// JSON-lines progress reporter for machine-readable output.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", value);
        }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let value = match event {
            ProgressEvent::ResolveStarted { total_packages, workers } => json!({
                "event": "resolve_started",
                "total_packages": total_packages,
                "workers": workers,
            }),
            ProgressEvent::PackageResolved { package, index, status, duration_ms } => {
                let mut value = json!({
                    "event": "package_resolved",
                    "package": package,
                    "index": index,
                    "duration_ms": duration_ms,
                });
                match status {
                    ResolveStatus::Contributed(glob) => {
                        value["status"] = json!("contributed");
                        value["glob"] = json!(glob);
                    }
                    ResolveStatus::Skipped => value["status"] = json!("skipped"),
                    ResolveStatus::Failed(err) => {
                        value["status"] = json!("failed");
                        value["error"] = json!(err);
                    }
                }
                value
            }
            ProgressEvent::ManifestWritten { path, entries } => json!({
                "event": "manifest_written",
                "path": path,
                "entries": entries,
            }),
            ProgressEvent::ManifestSkipped { root } => json!({
                "event": "manifest_skipped",
                "root": root,
            }),
            ProgressEvent::BuildCompleted {
                success,
                duration_ms,
                contributed,
                skipped,
                failed,
            } => {
                json!({
                    "event": "build_completed",
                    "success": success,
                    "duration_ms": duration_ms,
                    "contributed": contributed,
                    "skipped": skipped,
                    "failed": failed,
                })
            }
            ProgressEvent::Warning { package, message } => json!({
                "event": "warning",
                "package": package,
                "message": message,
            }),
            ProgressEvent::Error { package, message } => json!({
                "event": "error",
                "package": package,
                "message": message,
            }),
        };
        self.write_json(value);
    }
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
