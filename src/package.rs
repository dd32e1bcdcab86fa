//! Package descriptor model.
//!
//! A descriptor is the read-only metadata a package contributes to the build
//! graph. Only three fields matter here: the package `name`, the optional
//! `directories.views` path, and `build.type`. Everything else in a
//! `package.json` is ignored.
//!
//! # Example
//!
//! ```ignore
//! use copy_views::package::PackageDescriptor;
//!
//! let pkg = PackageDescriptor::from_json_str(r#"{
//!     "name": "thing",
//!     "directories": { "views": "views" },
//!     "build": { "type": "app" }
//! }"#)?;
//! assert!(pkg.is_app());
//! assert_eq!(pkg.views(), Some("views"));
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error loading a package descriptor.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DescriptorError {
    /// IO error
    #[error("Failed to read package descriptor: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, including a non-string `directories.views`
    #[error("Invalid package descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kind of output a package build produces.
///
/// Only `app` roots materialize a manifest. Unrecognized values are kept
/// verbatim so they survive a round trip through the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildType {
    /// Deployable application
    App,
    /// Library consumed by other packages
    Lib,
    /// Any other build type
    Other(String),
}

impl From<String> for BuildType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "app" => BuildType::App,
            "lib" => BuildType::Lib,
            _ => BuildType::Other(value),
        }
    }
}

impl From<BuildType> for String {
    fn from(value: BuildType) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildType::App => write!(f, "app"),
            BuildType::Lib => write!(f, "lib"),
            BuildType::Other(other) => write!(f, "{}", other),
        }
    }
}

/// The `directories` section of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directories {
    /// Views directory, relative to the package base path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
}

/// The `build` section of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Build type (`app`, `lib`, ...)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
}

/// Metadata about one package in the build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name, unique within a build graph
    pub name: String,
    /// Declared directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directories: Option<Directories>,
    /// Build settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSettings>,
}

impl PackageDescriptor {
    /// Create a descriptor with no directories and no build type.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), directories: None, build: None }
    }

    /// Set the views directory.
    pub fn with_views(mut self, views: impl Into<String>) -> Self {
        self.directories = Some(Directories { views: Some(views.into()) });
        self
    }

    /// Set the build type.
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build = Some(BuildSettings { build_type: Some(build_type) });
        self
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a descriptor from a JSON file (typically `package.json`).
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The declared views directory, if any.
    pub fn views(&self) -> Option<&str> {
        self.directories.as_ref().and_then(|d| d.views.as_deref())
    }

    /// The declared build type, if any.
    pub fn build_type(&self) -> Option<&BuildType> {
        self.build.as_ref().and_then(|b| b.build_type.as_ref())
    }

    /// Whether this package builds an application.
    pub fn is_app(&self) -> bool {
        matches!(self.build_type(), Some(BuildType::App))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let pkg = PackageDescriptor::from_json_str(
            r#"{"name":"thing","directories":{"views":"foo"},"build":{"type":"app"}}"#,
        )
        .unwrap();

        assert_eq!(pkg.name, "thing");
        assert_eq!(pkg.views(), Some("foo"));
        assert!(pkg.is_app());
    }

    #[test]
    fn test_parse_missing_directories() {
        let pkg =
            PackageDescriptor::from_json_str(r#"{"name":"thing","build":{"type":"app"}}"#).unwrap();

        assert!(pkg.directories.is_none());
        assert_eq!(pkg.views(), None);
    }

    #[test]
    fn test_parse_empty_directories() {
        let pkg = PackageDescriptor::from_json_str(r#"{"name":"thing","directories":{}}"#).unwrap();

        assert!(pkg.directories.is_some());
        assert_eq!(pkg.views(), None);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let pkg = PackageDescriptor::from_json_str(
            r#"{"name":"thing","version":"1.2.3","dependencies":{"a":"^1"}}"#,
        )
        .unwrap();

        assert_eq!(pkg.name, "thing");
    }

    #[test]
    fn test_non_string_views_is_an_error() {
        let err =
            PackageDescriptor::from_json_str(r#"{"name":"thing","directories":{"views":42}}"#)
                .unwrap_err();

        assert!(matches!(err, DescriptorError::Json(_)));
        assert!(err.to_string().contains("Invalid package descriptor"));
    }

    #[test]
    fn test_build_type_lib_is_not_app() {
        let pkg = PackageDescriptor::new("thing").with_build_type(BuildType::Lib);
        assert!(!pkg.is_app());
    }

    #[test]
    fn test_missing_build_type_is_not_app() {
        let pkg = PackageDescriptor::from_json_str(r#"{"name":"thing","build":{}}"#).unwrap();
        assert_eq!(pkg.build_type(), None);
        assert!(!pkg.is_app());
    }

    #[test]
    fn test_unknown_build_type_preserved() {
        let pkg =
            PackageDescriptor::from_json_str(r#"{"name":"thing","build":{"type":"plugin"}}"#)
                .unwrap();

        assert_eq!(pkg.build_type(), Some(&BuildType::Other("plugin".to_string())));
        let json = serde_json::to_string(&pkg).unwrap();
        assert!(json.contains(r#""type":"plugin""#));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, r#"{"name":"thing","directories":{"views":"views"}}"#).unwrap();

        let pkg = PackageDescriptor::load(&path).unwrap();
        assert_eq!(pkg.views(), Some("views"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PackageDescriptor::load(Path::new("/nonexistent/package.json")).unwrap_err();
        assert!(matches!(err, DescriptorError::Io(_)));
    }
}
