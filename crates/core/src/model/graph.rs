//! Output records handed to the rendering layer.

use super::kind::DeclarationKind;
use super::span::FilePosition;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: SmolStr,
    /// Id of the nearest enclosing node, absent for top-level declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub kind: DeclarationKind,
    pub file_position: FilePosition,
    /// 1-based line of the declaration start.
    pub start_line: usize,
    pub line_count: usize,
    pub node_size: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: usize,
    pub references: Vec<FilePosition>,
}

impl GraphEdge {
    pub fn edge_id(source: &str, target: &str) -> String {
        format!("{}-{}", source, target)
    }
}

/// Nodes and weighted reference edges computed for one file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(id))
    }

    /// Builds a directed view over node ids with edge weights, for layout consumers.
    pub fn topology(&self) -> DiGraph<&str, usize> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
        }
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) {
                graph.add_edge(from, to, edge.weight);
            }
        }
        graph
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            name: SmolStr::from(id.rsplit('.').next().unwrap_or(id)),
            parent: parent.map(str::to_string),
            kind: DeclarationKind::Function,
            file_position: FilePosition {
                file_name: "a.ts".to_string(),
                line: 0,
                column: 0,
            },
            start_line: 1,
            line_count: 0,
            node_size: 30,
        }
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_parent() {
        let json = serde_json::to_value(node("a.f", None)).unwrap();
        assert_eq!(json["filePosition"]["fileName"], "a.ts");
        assert_eq!(json["kind"], "function");
        assert_eq!(json["nodeSize"], 30);
        assert!(json.get("parent").is_none());
    }

    #[test]
    fn topology_skips_edges_with_unknown_endpoints() {
        let graph = DependencyGraph {
            nodes: vec![node("a.f", None), node("a.g", None)],
            edges: vec![
                GraphEdge {
                    id: GraphEdge::edge_id("a.f", "a.g"),
                    source: "a.f".into(),
                    target: "a.g".into(),
                    weight: 2,
                    references: vec![],
                },
                GraphEdge {
                    id: GraphEdge::edge_id("a.f", "a.missing"),
                    source: "a.f".into(),
                    target: "a.missing".into(),
                    weight: 1,
                    references: vec![],
                },
            ],
        };
        let topology = graph.topology();
        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.edge_count(), 1);
        assert_eq!(topology.edge_weights().copied().collect::<Vec<_>>(), vec![2]);
    }
}
