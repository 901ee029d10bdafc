//! Graph assembly for one TypeScript file.

use crate::classify::{Classifier, SourceDeclaration};
use crate::identity::{IdentityResolver, parent_ids};
use crate::parser::TypeScriptParser;
use crate::references::{ReferenceLocator, SyntaxReferenceSearch};
use crate::scope::{ScopeBuilder, ScopeManager};
use smol_str::SmolStr;
use std::collections::HashMap;
use tracing::{debug, trace, warn};
use tsuml_core::aggregate::EdgeAggregator;
use tsuml_core::capability::ReferenceSearch;
use tsuml_core::config::GraphConfig;
use tsuml_core::error::Result;
use tsuml_core::model::{DeclarationKind, DependencyGraph, FilePosition, GraphNode};

/// Whether the framework namespace import is referenced anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkAliasUsage {
    pub name: SmolStr,
    pub used: bool,
}

#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub graph: DependencyGraph,
    pub framework_alias: Option<FrameworkAliasUsage>,
    pub has_jsx: bool,
}

impl FileAnalysis {
    /// An unreferenced framework import is still needed when the file has JSX.
    pub fn framework_alias_unused(&self) -> bool {
        self.framework_alias
            .as_ref()
            .is_some_and(|alias| !alias.used && !self.has_jsx)
    }
}

pub struct TypeScriptAnalyzer {
    config: GraphConfig,
    parser: TypeScriptParser,
}

impl TypeScriptAnalyzer {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            parser: TypeScriptParser::new(),
        }
    }

    /// Builds the dependency graph of `source`, identified by `file_name`.
    pub fn compute_graph(&self, source: &str, file_name: &str) -> Result<DependencyGraph> {
        self.analyze(source, file_name).map(|analysis| analysis.graph)
    }

    pub fn analyze(&self, source: &str, file_name: &str) -> Result<FileAnalysis> {
        let parsed = self.parser.parse(file_name, source)?;
        let scopes = ScopeBuilder::new(&parsed).build();
        let classified = Classifier::new(&self.config, &parsed).classify();
        let declarations = &classified.declarations;

        let mut resolver = IdentityResolver::new(&scopes, &parsed);
        let mut ids = resolver.resolve_all(declarations);
        separate_collisions(declarations, &mut ids, &scopes);
        let parents = parent_ids(declarations, &ids);

        let mut nodes = Vec::new();
        let mut seen: HashMap<&str, DeclarationKind> = HashMap::new();
        let mut primaries = Vec::new();
        let mut parent_of: HashMap<String, String> = HashMap::new();
        for (index, declaration) in declarations.iter().enumerate() {
            let Some(id) = ids[index].as_deref() else {
                debug!("skipping {} without a stable id", declaration.name);
                continue;
            };
            if let Some(first) = seen.get(id) {
                trace!(
                    "merging {} ({}) into the existing {} node",
                    id, declaration.kind, first
                );
                continue;
            }
            seen.insert(id, declaration.kind);
            primaries.push(index);
            if let Some(parent) = &parents[index] {
                parent_of.insert(id.to_string(), parent.clone());
            }
            nodes.push(self.graph_node(declaration, id, parents[index].clone(), file_name));
        }

        let search = SyntaxReferenceSearch::new(&parsed, &scopes);
        let locator = ReferenceLocator::new(&search, declarations);
        let mut aggregator = EdgeAggregator::new(parent_of);
        for &target in &primaries {
            for occurrence in locator.locate(target)? {
                let position = FilePosition::at(file_name, &occurrence.span);
                if let Err(reason) = aggregator.add(
                    ids[occurrence.source].as_deref(),
                    ids[target].as_deref(),
                    position,
                ) {
                    trace!(
                        "reference from {} to {} not counted: {:?}",
                        declarations[occurrence.source].name,
                        declarations[target].name,
                        reason
                    );
                }
            }
        }

        let framework_alias = match classified.framework_alias {
            Some(alias) => Some(FrameworkAliasUsage {
                used: !search.find_references(&alias.name_span)?.is_empty(),
                name: alias.name,
            }),
            None => None,
        };

        debug!(
            "{} ({:?}): {} nodes, {} edges",
            file_name,
            parsed.language,
            nodes.len(),
            aggregator.len()
        );

        Ok(FileAnalysis {
            graph: DependencyGraph {
                nodes,
                edges: aggregator.finish(),
            },
            framework_alias,
            has_jsx: classified.has_jsx,
        })
    }

    fn graph_node(
        &self,
        declaration: &SourceDeclaration,
        id: &str,
        parent: Option<String>,
        file_name: &str,
    ) -> GraphNode {
        let line_count = declaration.span.range.line_count();
        GraphNode {
            id: id.to_string(),
            name: declaration.name.clone(),
            parent,
            kind: declaration.kind,
            file_position: FilePosition::at(file_name, &declaration.name_span),
            start_line: declaration.span.range.start_line + 1,
            line_count,
            node_size: self.config.node_size(line_count),
        }
    }
}

/// The symbol a declaration name belongs to: the scope holding it as a local
/// and the owner holding it as a member.
type SymbolKey = (Option<usize>, Option<usize>);

/// Overloads, accessor pairs and merged declarations share one symbol and
/// keep their common id. Any other declaration whose id is already taken
/// gets its name position appended.
fn separate_collisions(
    declarations: &[SourceDeclaration],
    ids: &mut [Option<String>],
    scopes: &ScopeManager,
) {
    let mut owners: HashMap<String, Option<SymbolKey>> = HashMap::new();
    for (declaration, slot) in declarations.iter().zip(ids.iter_mut()) {
        let Some(id) = slot.as_ref() else {
            continue;
        };
        let key = scopes
            .site(&declaration.name_span)
            .map(|site| (site.scope, site.owner));
        match owners.get(id) {
            None => {
                owners.insert(id.clone(), key);
            }
            Some(first) if first.is_some() && *first == key => {}
            Some(_) => {
                let range = &declaration.name_span.range;
                let separated = format!("{}@{}:{}", id, range.start_line + 1, range.start_col + 1);
                warn!(
                    "{} ({}) collides with an unrelated declaration; using {}",
                    id, declaration.kind, separated
                );
                owners.insert(separated.clone(), key);
                *slot = Some(separated);
            }
        }
    }
}

impl Default for TypeScriptAnalyzer {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}
