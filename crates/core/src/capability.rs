//! Services the pipeline consumes from the language front end.
//!
//! Syntax nodes are addressed by the front end's stable per-tree node id.

use crate::error::Result;
use crate::model::Span;

/// Lexical scope lookup.
pub trait ScopeTable {
    /// True when `name`, declared at `declaration`, is registered in the local
    /// scope table of the syntax node `container`.
    fn is_local(&self, container: usize, name: &str, declaration: &Span) -> bool;
}

/// "Find all references" seeded at a declaration's name.
pub trait ReferenceSearch {
    /// Returns every usage of the declaration named at `name_span`, in document
    /// order, excluding declaration sites.
    ///
    /// Fails when `name_span` does not name a declaration known to the search.
    fn find_references(&self, name_span: &Span) -> Result<Vec<Span>>;
}
