//! Edge aggregation.
//!
//! Collapses (referencing, referenced) id pairs into weighted edges keyed by
//! `source-target`, in first-seen order.

use crate::model::{FilePosition, GraphEdge};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::collections::HashMap;
use tracing::trace;

/// Why a pair did not become (part of) an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    UnresolvedSource,
    UnresolvedTarget,
    SelfReference,
    Containment,
    DuplicatePosition,
}

#[derive(Debug, Default)]
pub struct EdgeAggregator {
    /// child id -> parent id, for every node that has a parent.
    parents: HashMap<String, String>,
    edges: IndexMap<String, GraphEdge>,
}

impl EdgeAggregator {
    pub fn new(parents: HashMap<String, String>) -> Self {
        Self {
            parents,
            edges: IndexMap::new(),
        }
    }

    fn is_parent_of(&self, parent: &str, child: &str) -> bool {
        self.parents.get(child).is_some_and(|p| p == parent)
    }

    /// Adds one occurrence, or reports why it does not count.
    pub fn add(
        &mut self,
        source: Option<&str>,
        target: Option<&str>,
        position: FilePosition,
    ) -> Result<(), Rejected> {
        let source = source.ok_or(Rejected::UnresolvedSource)?;
        let target = target.ok_or(Rejected::UnresolvedTarget)?;
        if source == target {
            return Err(Rejected::SelfReference);
        }
        if self.is_parent_of(source, target) || self.is_parent_of(target, source) {
            trace!("containment pair {} / {} dropped", source, target);
            return Err(Rejected::Containment);
        }

        match self.edges.entry(GraphEdge::edge_id(source, target)) {
            Entry::Occupied(mut occupied) => {
                let edge = occupied.get_mut();
                if edge.references.contains(&position) {
                    return Err(Rejected::DuplicatePosition);
                }
                edge.references.push(position);
                edge.weight = edge.references.len();
            }
            Entry::Vacant(vacant) => {
                let id = vacant.key().clone();
                vacant.insert(GraphEdge {
                    id,
                    source: source.to_string(),
                    target: target.to_string(),
                    weight: 1,
                    references: vec![position],
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn finish(self) -> Vec<GraphEdge> {
        self.edges.into_values().collect()
    }
}
