use tsuml_core::config::GraphConfig;
use tsuml_core::model::{DependencyGraph, GraphNode};
use tsuml_typescript::TypeScriptAnalyzer;

#[allow(dead_code)]
pub fn build_graph(file_name: &str, source: &str) -> DependencyGraph {
    build_graph_with(GraphConfig::default(), file_name, source)
}

#[allow(dead_code)]
pub fn build_graph_with(config: GraphConfig, file_name: &str, source: &str) -> DependencyGraph {
    TypeScriptAnalyzer::new(config)
        .compute_graph(source, file_name)
        .expect("graph builds")
}

#[allow(dead_code)]
pub fn node_names(graph: &DependencyGraph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.name.as_str()).collect()
}

/// The single node called `name`.
#[allow(dead_code)]
pub fn node<'g>(graph: &'g DependencyGraph, name: &'g str) -> &'g GraphNode {
    let mut matches = graph.nodes_named(name);
    let found = matches
        .next()
        .unwrap_or_else(|| panic!("no node named {}", name));
    assert!(matches.next().is_none(), "several nodes named {}", name);
    found
}

/// Structural guarantees every computed graph must satisfy.
#[allow(dead_code)]
pub fn assert_graph_invariants(graph: &DependencyGraph) {
    let mut ids = std::collections::HashSet::new();
    for node in &graph.nodes {
        assert!(ids.insert(node.id.as_str()), "duplicate node id {}", node.id);
        assert_ne!(node.parent.as_deref(), Some(node.id.as_str()));
    }
    for edge in &graph.edges {
        assert_ne!(edge.source, edge.target, "self edge {}", edge.id);
        assert_eq!(edge.id, format!("{}-{}", edge.source, edge.target));
        assert_eq!(edge.weight, edge.references.len(), "weight of {}", edge.id);
        let source = graph.node(&edge.source).expect("edge source is a node");
        let target = graph.node(&edge.target).expect("edge target is a node");
        assert_ne!(source.parent.as_deref(), Some(target.id.as_str()));
        assert_ne!(target.parent.as_deref(), Some(source.id.as_str()));
    }
}
