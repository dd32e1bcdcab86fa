//! Build graph description.
//!
//! The graph is produced by whatever loads the workspace's packages; this
//! crate only consumes it. It is a JSON document listing every package in
//! its stable graph position:
//!
//! ```json
//! {
//!   "root": "thing-foo",
//!   "packages": [
//!     {
//!       "base_path": "thing-foo",
//!       "chain": ["thing-foo"],
//!       "package": { "name": "thing-foo", "directories": { "views": "foo" }, "build": { "type": "app" } }
//!     },
//!     {
//!       "base_path": "thing-foo-plugin-bar",
//!       "chain": ["thing-foo", "thing-foo-plugin-bar"],
//!       "package": { "name": "thing-foo-plugin-bar", "directories": { "views": "bar" } }
//!     }
//!   ]
//! }
//! ```
//!
//! A node's index is its position in `packages` unless it sets `index`.
//! Effective indices must be unique across the graph. Without `root`, the
//! first package is the root.

use crate::package::PackageDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Error loading or querying a build graph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// IO error
    #[error("Failed to read build graph: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Invalid build graph: {0}")]
    Json(#[from] serde_json::Error),
    /// The named root is not in the graph
    #[error("Root package '{0}' is not in the build graph")]
    UnknownRoot(String),
    /// The graph has no packages
    #[error("Build graph contains no packages")]
    Empty,
    /// Two nodes resolve to the same graph index
    #[error("Graph index {index} is used by both '{first}' and '{second}'")]
    DuplicateIndex { index: usize, first: String, second: String },
}

fn default_base_path() -> String {
    ".".to_string()
}

/// One package in the build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Prefix the package's views directory is relative to
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Package names from the root down to this package
    #[serde(default)]
    pub chain: Vec<String>,
    /// Explicit graph index (defaults to the node's position)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// The package descriptor
    pub package: PackageDescriptor,
}

impl GraphNode {
    /// Create a node for `package` rooted at `base_path`.
    pub fn new(package: PackageDescriptor, base_path: impl Into<String>) -> Self {
        Self { base_path: base_path.into(), chain: vec![], index: None, package }
    }

    /// Set the dependency chain.
    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }

    /// Pin the graph index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// All packages taking part in one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildGraph {
    /// Name of the package being built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Packages in graph order
    #[serde(default)]
    pub packages: Vec<GraphNode>,
}

impl BuildGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a graph from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a graph from a JSON file.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Set the root package name.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Append a node.
    pub fn add_node(&mut self, node: GraphNode) {
        self.packages.push(node);
    }

    /// Number of packages in the graph.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Nodes paired with their effective graph index.
    ///
    /// Fails with [`GraphError::DuplicateIndex`] when a pinned index
    /// collides with another node's pinned index or position.
    pub fn indexed(&self) -> Result<Vec<(usize, &GraphNode)>, GraphError> {
        let mut seen: HashMap<usize, &str> = HashMap::with_capacity(self.packages.len());
        let mut nodes = Vec::with_capacity(self.packages.len());

        for (pos, node) in self.packages.iter().enumerate() {
            let index = node.index.unwrap_or(pos);
            if let Some(first) = seen.insert(index, &node.package.name) {
                return Err(GraphError::DuplicateIndex {
                    index,
                    first: first.to_string(),
                    second: node.package.name.clone(),
                });
            }
            nodes.push((index, node));
        }

        Ok(nodes)
    }

    /// The root package descriptor.
    pub fn root(&self) -> Result<&PackageDescriptor, GraphError> {
        match &self.root {
            Some(name) => self
                .packages
                .iter()
                .map(|n| &n.package)
                .find(|p| &p.name == name)
                .ok_or_else(|| GraphError::UnknownRoot(name.clone())),
            None => self.packages.first().map(|n| &n.package).ok_or(GraphError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::BuildType;

    const GRAPH: &str = r#"{
        "root": "thing-foo",
        "packages": [
            {
                "base_path": "thing-foo",
                "chain": ["thing-foo"],
                "package": {"name": "thing-foo", "directories": {"views": "foo"}, "build": {"type": "app"}}
            },
            {
                "base_path": "thing-foo-plugin-bar",
                "chain": ["thing-foo", "thing-foo-plugin-bar"],
                "package": {"name": "thing-foo-plugin-bar", "directories": {"views": "bar"}}
            }
        ]
    }"#;

    #[test]
    fn test_parse_graph() {
        let graph = BuildGraph::from_json_str(GRAPH).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.root().unwrap().name, "thing-foo");
        assert_eq!(graph.packages[1].chain, vec!["thing-foo", "thing-foo-plugin-bar"]);
    }

    #[test]
    fn test_indexed_uses_position_by_default() {
        let graph = BuildGraph::from_json_str(GRAPH).unwrap();
        let indices: Vec<usize> = graph.indexed().unwrap().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_indexed_respects_explicit_index() {
        let mut graph = BuildGraph::new();
        graph.add_node(GraphNode::new(PackageDescriptor::new("a"), ".").with_index(10));
        graph.add_node(GraphNode::new(PackageDescriptor::new("b"), "."));

        let indices: Vec<usize> = graph.indexed().unwrap().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![10, 1]);
    }

    #[test]
    fn test_indexed_rejects_pinned_index_colliding_with_position() {
        let graph = BuildGraph::from_json_str(
            r#"{"packages":[
                {"index":1,"package":{"name":"a","directories":{"views":"v"}}},
                {"package":{"name":"b","directories":{"views":"v"}}}
            ]}"#,
        )
        .unwrap();

        match graph.indexed() {
            Err(GraphError::DuplicateIndex { index, first, second }) => {
                assert_eq!(index, 1);
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("expected duplicate index, got {:?}", other.map(|n| n.len())),
        }
    }

    #[test]
    fn test_indexed_rejects_two_pinned_indices() {
        let mut graph = BuildGraph::new();
        graph.add_node(GraphNode::new(PackageDescriptor::new("a"), ".").with_index(4));
        graph.add_node(GraphNode::new(PackageDescriptor::new("b"), ".").with_index(4));

        assert!(matches!(graph.indexed(), Err(GraphError::DuplicateIndex { index: 4, .. })));
    }

    #[test]
    fn test_base_path_defaults_to_dot() {
        let graph =
            BuildGraph::from_json_str(r#"{"packages":[{"package":{"name":"thing"}}]}"#).unwrap();
        assert_eq!(graph.packages[0].base_path, ".");
        assert!(graph.packages[0].chain.is_empty());
    }

    #[test]
    fn test_root_defaults_to_first() {
        let mut graph = BuildGraph::new();
        graph.add_node(GraphNode::new(
            PackageDescriptor::new("first").with_build_type(BuildType::App),
            ".",
        ));
        graph.add_node(GraphNode::new(PackageDescriptor::new("second"), "second"));

        assert_eq!(graph.root().unwrap().name, "first");
    }

    #[test]
    fn test_unknown_root() {
        let graph = BuildGraph::from_json_str(GRAPH).unwrap().with_root("missing");
        assert!(matches!(graph.root(), Err(GraphError::UnknownRoot(name)) if name == "missing"));
    }

    #[test]
    fn test_empty_graph_has_no_root() {
        assert!(matches!(BuildGraph::new().root(), Err(GraphError::Empty)));
    }

    #[test]
    fn test_malformed_descriptor_in_graph() {
        let err = BuildGraph::from_json_str(
            r#"{"packages":[{"package":{"name":"x","directories":{"views":["a"]}}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }
}
