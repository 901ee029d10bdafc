//! Reference search and attribution.
//!
//! [`SyntaxReferenceSearch`] finds the usages of a declaration by matching
//! identifier tokens against the scope tables. [`ReferenceLocator`] then
//! attributes each usage to the innermost declaration whose span contains it.

use crate::classify::SourceDeclaration;
use crate::parser::syntax::{is_class_like, is_function_like, named_children, text};
use crate::parser::{ParsedFile, span_of};
use crate::scope::{Binding, DeclarationSite, ScopeManager};
use std::collections::HashMap;
use tracing::trace;
use tree_sitter::Node;
use tsuml_core::capability::ReferenceSearch;
use tsuml_core::error::{GraphError, Result};
use tsuml_core::model::Span;

/// Base classes are followed this many levels when looking up members.
const MAX_INHERITANCE_DEPTH: usize = 16;

/// How an identifier token is used.
enum Usage<'t> {
    /// A bare name, resolved through the lexical scope chain.
    Lexical,
    /// The right-hand side of `receiver.name`.
    Member { receiver: Node<'t> },
    /// Not a usage (object keys, export aliases, remote import names).
    Ignored,
}

/// What the receiver of a member access denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Receiver {
    Owner(usize),
    /// A module or global: never one of this file's members.
    External,
    Unknown,
}

pub struct SyntaxReferenceSearch<'a> {
    file: &'a ParsedFile,
    scopes: &'a ScopeManager,
    /// Identifier-like tokens grouped by text, in document order.
    tokens: HashMap<&'a str, Vec<Node<'a>>>,
    /// Class node id -> expression of its `extends` clause.
    bases: HashMap<usize, Node<'a>>,
}

impl<'a> SyntaxReferenceSearch<'a> {
    pub fn new(file: &'a ParsedFile, scopes: &'a ScopeManager) -> Self {
        let mut search = Self {
            file,
            scopes,
            tokens: HashMap::new(),
            bases: HashMap::new(),
        };
        search.index(file.root());
        search
    }

    fn index(&mut self, node: Node<'a>) {
        let file = self.file;
        let kind = node.kind();
        if matches!(
            kind,
            "identifier"
                | "type_identifier"
                | "property_identifier"
                | "private_property_identifier"
                | "shorthand_property_identifier"
                | "shorthand_property_identifier_pattern"
        ) {
            self.tokens
                .entry(text(&node, &file.source))
                .or_default()
                .push(node);
            return;
        }
        if is_class_like(kind) {
            if let Some(base) = extends_expression(&node) {
                self.bases.insert(node.id(), base);
            }
        }
        for child in named_children(&node) {
            self.index(child);
        }
    }

    fn text(&self, node: &Node) -> &'a str {
        let file = self.file;
        text(node, &file.source)
    }

    fn refers_to(&self, token: Node<'a>, site: &DeclarationSite) -> bool {
        match usage(&token) {
            Usage::Ignored => false,
            Usage::Lexical => self
                .resolve_lexical(&token, &site.name)
                .is_some_and(|bindings| bindings.contains(&site.binding)),
            Usage::Member { receiver } => {
                if site.owner.is_none() {
                    return false;
                }
                let mut resolving = Vec::new();
                match self.receiver(&receiver, &mut resolving) {
                    Receiver::Owner(owner) => self
                        .member_lookup(owner, &site.name, &mut resolving)
                        .is_some_and(|bindings| bindings.contains(&site.binding)),
                    Receiver::External => false,
                    Receiver::Unknown => self.sole_owner_of(&site.name) == site.owner,
                }
            }
        }
    }

    /// Resolves a bare name at `node` through the enclosing scopes.
    fn resolve_lexical(&self, node: &Node<'a>, name: &str) -> Option<&'a [Binding]> {
        let scope = std::iter::successors(node.parent(), |n| n.parent())
            .find_map(|ancestor| self.scopes.get_scope_id(ancestor.id()))?;
        self.scopes.lookup_symbol(scope, name)
    }

    /// `resolving` holds the classes whose base is being resolved further up
    /// the call chain; meeting one again means the `extends` clauses loop.
    fn receiver(&self, node: &Node<'a>, resolving: &mut Vec<usize>) -> Receiver {
        match node.kind() {
            "this" => self
                .enclosing_class(node)
                .map(|class| Receiver::Owner(class.id()))
                .unwrap_or(Receiver::Unknown),
            "super" => self
                .enclosing_class(node)
                .and_then(|class| self.base_owner(class.id(), resolving))
                .map(Receiver::Owner)
                .unwrap_or(Receiver::Unknown),
            "identifier" | "type_identifier" => {
                match self.resolve_lexical(node, self.text(node)) {
                    None => Receiver::External,
                    Some(bindings) => self.classify_binding(bindings),
                }
            }
            "member_expression" | "nested_identifier" | "nested_type_identifier" => {
                let (object, property) = match node.kind() {
                    "nested_type_identifier" => (
                        node.child_by_field_name("module"),
                        node.child_by_field_name("name"),
                    ),
                    _ => (
                        node.child_by_field_name("object"),
                        node.child_by_field_name("property"),
                    ),
                };
                let (Some(object), Some(property)) = (object, property) else {
                    return Receiver::Unknown;
                };
                match self.receiver(&object, resolving) {
                    Receiver::Owner(owner) => self
                        .member_lookup(owner, self.text(&property), resolving)
                        .map(|bindings| self.classify_binding(bindings))
                        .unwrap_or(Receiver::Unknown),
                    other => other,
                }
            }
            "parenthesized_expression" | "non_null_expression" => named_children(node)
                .first()
                .map(|inner| self.receiver(inner, resolving))
                .unwrap_or(Receiver::Unknown),
            _ => Receiver::Unknown,
        }
    }

    fn classify_binding(&self, bindings: &[Binding]) -> Receiver {
        let Some(binding) = bindings.first() else {
            return Receiver::Unknown;
        };
        if self.scopes.is_owner(binding.declaration) {
            Receiver::Owner(binding.declaration)
        } else if self.scopes.is_import(binding.declaration) {
            Receiver::External
        } else {
            Receiver::Unknown
        }
    }

    /// The class `this` refers to: arrow functions and methods see through,
    /// plain functions rebind it.
    fn enclosing_class(&self, node: &Node<'a>) -> Option<Node<'a>> {
        for ancestor in std::iter::successors(node.parent(), |n| n.parent()) {
            let kind = ancestor.kind();
            if is_class_like(kind) {
                return Some(ancestor);
            }
            if is_function_like(kind) && !matches!(kind, "arrow_function" | "method_definition") {
                return None;
            }
        }
        None
    }

    fn base_owner(&self, class: usize, resolving: &mut Vec<usize>) -> Option<usize> {
        let base = self.bases.get(&class)?;
        if resolving.contains(&class) || resolving.len() >= MAX_INHERITANCE_DEPTH {
            trace!("giving up on the base of class node {}", class);
            return None;
        }
        resolving.push(class);
        let resolved = self.receiver(base, resolving);
        resolving.pop();
        match resolved {
            Receiver::Owner(owner) if owner != class => Some(owner),
            _ => None,
        }
    }

    /// Member lookup that follows `extends` chains.
    fn member_lookup(
        &self,
        owner: usize,
        name: &str,
        resolving: &mut Vec<usize>,
    ) -> Option<&'a [Binding]> {
        let mut current = owner;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Some(bindings) = self.scopes.member(current, name) {
                return Some(bindings);
            }
            current = self.base_owner(current, resolving)?;
        }
        None
    }

    /// The owner declaring `name`, when exactly one does.
    fn sole_owner_of(&self, name: &str) -> Option<usize> {
        let mut owners = self.scopes.owners_with_member(name);
        let first = owners.next()?;
        owners.next().is_none().then_some(first)
    }
}

impl ReferenceSearch for SyntaxReferenceSearch<'_> {
    fn find_references(&self, name_span: &Span) -> Result<Vec<Span>> {
        let site = self.scopes.site(name_span).ok_or_else(|| {
            GraphError::Reference(format!(
                "no declaration at {}:{}:{}",
                self.file.file_name,
                name_span.range.start_line + 1,
                name_span.range.start_col + 1
            ))
        })?;

        let Some(tokens) = self.tokens.get(site.name.as_str()) else {
            return Ok(Vec::new());
        };
        Ok(tokens
            .iter()
            .filter(|token| !self.scopes.is_declaration_token(token.start_byte()))
            .filter(|token| self.refers_to(**token, site))
            .map(span_of)
            .collect())
    }
}

fn usage<'t>(token: &Node<'t>) -> Usage<'t> {
    let Some(parent) = token.parent() else {
        return Usage::Lexical;
    };
    let is_field = |field: &str| parent.child_by_field_name(field) == Some(*token);
    match token.kind() {
        "property_identifier" | "private_property_identifier" => {
            match parent.kind() {
                "member_expression" | "nested_identifier" if is_field("property") => {
                    match parent.child_by_field_name("object") {
                        Some(receiver) => Usage::Member { receiver },
                        None => Usage::Ignored,
                    }
                }
                _ => Usage::Ignored,
            }
        }
        "type_identifier" if parent.kind() == "nested_type_identifier" && is_field("name") => {
            match parent.child_by_field_name("module") {
                Some(receiver) => Usage::Member { receiver },
                None => Usage::Ignored,
            }
        }
        "identifier" => match parent.kind() {
            "import_specifier" if parent.child_by_field_name("alias").is_some() && is_field("name") => {
                Usage::Ignored
            }
            "export_specifier" if is_field("alias") => Usage::Ignored,
            "nested_identifier" if is_field("property") => match parent.child_by_field_name("object") {
                Some(receiver) => Usage::Member { receiver },
                None => Usage::Ignored,
            },
            _ => Usage::Lexical,
        },
        _ => Usage::Lexical,
    }
}

fn extends_expression<'t>(class: &Node<'t>) -> Option<Node<'t>> {
    let heritage = named_children(class)
        .into_iter()
        .find(|c| c.kind() == "class_heritage")?;
    let extends = named_children(&heritage)
        .into_iter()
        .find(|c| c.kind() == "extends_clause")?;
    extends
        .child_by_field_name("value")
        .or_else(|| named_children(&extends).into_iter().next())
}

/// One usage of a declaration, attributed to the declaration containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOccurrence {
    /// Index of the referencing declaration.
    pub source: usize,
    pub span: Span,
}

pub struct ReferenceLocator<'a, 'tree> {
    search: &'a dyn ReferenceSearch,
    declarations: &'a [SourceDeclaration<'tree>],
}

impl<'a, 'tree> ReferenceLocator<'a, 'tree> {
    pub fn new(search: &'a dyn ReferenceSearch, declarations: &'a [SourceDeclaration<'tree>]) -> Self {
        Self {
            search,
            declarations,
        }
    }

    /// Usages of `declarations[target]`, each paired with the innermost
    /// declaration containing it. Usages outside every declaration are dropped.
    pub fn locate(&self, target: usize) -> Result<Vec<ReferenceOccurrence>> {
        let declaration = self.declarations.get(target).ok_or_else(|| {
            GraphError::Internal(format!("declaration index {} out of range", target))
        })?;
        let spans = self.search.find_references(&declaration.name_span)?;

        let mut occurrences = Vec::with_capacity(spans.len());
        for span in spans {
            if span == declaration.name_span {
                continue;
            }
            match self.innermost_containing(span.start) {
                Some(source) => occurrences.push(ReferenceOccurrence { source, span }),
                None => trace!(
                    "usage of {} at {}:{} is outside every declaration",
                    declaration.name,
                    span.range.start_line + 1,
                    span.range.start_col + 1
                ),
            }
        }
        Ok(occurrences)
    }

    /// Smallest declaration span containing `offset`; the first declared
    /// wins among equal lengths.
    pub fn innermost_containing(&self, offset: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, declaration) in self.declarations.iter().enumerate() {
            if !declaration.span.contains_offset(offset) {
                continue;
            }
            let len = declaration.span.len();
            if best.is_none_or(|(_, best_len)| len < best_len) {
                best = Some((index, len));
            }
        }
        best.map(|(index, _)| index)
    }
}
