//! Stable, dot-separated ids for declarations.
//!
//! An id is built by walking outwards from the declaration. Named ancestors
//! contribute their name. The walk ends at the file root, or at the first
//! ancestor whose scope holds the declaration as a local; such locals are
//! anchored as `<file>.<container>@<line>:<col>.<name>` so that same-named
//! locals in different bodies stay distinct. Object literals and class
//! expressions that no declaration names are anchored the same way.

use crate::classify::SourceDeclaration;
use crate::parser::ParsedFile;
use crate::parser::syntax::{anchor_label, is_anonymous_owner, path_segment};
use std::collections::HashMap;
use tracing::trace;
use tsuml_core::capability::ScopeTable;

pub struct IdentityResolver<'a> {
    scopes: &'a dyn ScopeTable,
    file: &'a ParsedFile,
    root_segment: String,
    /// Keyed by the start byte of the declaration name.
    cache: HashMap<usize, Option<String>>,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(scopes: &'a dyn ScopeTable, file: &'a ParsedFile) -> Self {
        Self {
            scopes,
            file,
            root_segment: file.id_root(),
            cache: HashMap::new(),
        }
    }

    /// Returns `None` when the walk never reaches a terminating ancestor.
    pub fn resolve(&mut self, declaration: &SourceDeclaration) -> Option<String> {
        if let Some(cached) = self.cache.get(&declaration.name_span.start) {
            return cached.clone();
        }
        let id = self.compute(declaration);
        if id.is_none() {
            trace!("no id for declaration {}", declaration.name);
        }
        self.cache
            .insert(declaration.name_span.start, id.clone());
        id
    }

    fn compute(&self, declaration: &SourceDeclaration) -> Option<String> {
        let mut parts = vec![declaration.name.to_string()];
        for ancestor in declaration.ancestors() {
            if ancestor.kind() == "program" {
                parts.push(self.root_segment.clone());
                return Some(join_reversed(parts));
            }
            if self
                .scopes
                .is_local(ancestor.id(), &declaration.name, &declaration.name_span)
            {
                parts.push(anchor_label(&ancestor, &self.file.source));
                parts.push(self.root_segment.clone());
                return Some(join_reversed(parts));
            }
            if let Some(segment) = path_segment(&ancestor, &self.file.source) {
                parts.push(segment.to_string());
            } else if is_anonymous_owner(&ancestor, &self.file.source) {
                parts.push(anchor_label(&ancestor, &self.file.source));
            }
        }
        None
    }

    pub fn resolve_all(&mut self, declarations: &[SourceDeclaration]) -> Vec<Option<String>> {
        declarations.iter().map(|d| self.resolve(d)).collect()
    }
}

fn join_reversed(mut parts: Vec<String>) -> String {
    parts.reverse();
    parts.join(".")
}

/// For each declaration, the id of the nearest enclosing declaration that
/// has an id of its own and differs from it.
pub fn parent_ids(declarations: &[SourceDeclaration], ids: &[Option<String>]) -> Vec<Option<String>> {
    let mut by_node: HashMap<usize, usize> = HashMap::with_capacity(declarations.len());
    for (index, declaration) in declarations.iter().enumerate() {
        by_node.entry(declaration.node.id()).or_insert(index);
    }

    declarations
        .iter()
        .zip(ids)
        .map(|(declaration, own)| {
            declaration
                .ancestors()
                .filter_map(|ancestor| by_node.get(&ancestor.id()))
                .filter_map(|&index| ids[index].as_ref())
                .find(|candidate| Some(*candidate) != own.as_ref())
                .cloned()
        })
        .collect()
}
