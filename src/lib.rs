//! copy-views - views manifest step for package build graphs
//!
//! This library provides functionality to:
//! - Load package descriptors and build graph descriptions
//! - Resolve each package's views directory into an index-ordered aggregate
//! - Write the `copy-views-args` manifest for application builds

pub mod build;
pub mod cli;
pub mod config;
pub mod package;
pub mod plugin;
pub mod views;
