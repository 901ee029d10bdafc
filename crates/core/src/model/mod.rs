pub mod graph;
pub mod kind;
pub mod span;

pub use graph::{DependencyGraph, GraphEdge, GraphNode};
pub use kind::DeclarationKind;
pub use span::{FilePosition, Range, Span};
