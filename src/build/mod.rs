//! Views manifest build module
//!
//! Collects the views directories of every package in a build graph and
//! writes them to a single manifest for the asset-copy step.
//!
//! # Overview
//!
//! A build runs in two phases:
//! - **Resolve**: each package contributes at most one glob, keyed by its
//!   graph index, into a [`ViewAggregate`]. Resolves run concurrently.
//! - **Write**: once every resolve has finished, the root package decides
//!   whether the manifest is written (only for `app` roots).
//!
//! # Example
//!
//! ```ignore
//! use copy_views::build::{write_manifest, ViewAggregate};
//!
//! let aggregate = ViewAggregate::new();
//! aggregate.resolve(&app, ".", 0, &["app"])?;
//! aggregate.resolve(&plugin, "node_modules/plugin", 1, &["app", "plugin"])?;
//! write_manifest(&aggregate, &app, Path::new("build"))?;
//! ```

pub mod aggregate;
pub mod context;
pub mod graph;
pub mod parallel;
pub mod progress;
pub mod result;
pub mod writer;

pub use aggregate::*;
pub use context::*;
pub use graph::*;
pub use parallel::*;
pub use result::*;
pub use writer::*;
