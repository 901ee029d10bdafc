//! Scope manager for lexical scopes, member tables and declaration sites.

use super::table::{Binding, SymbolTable};
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use tsuml_core::capability::ScopeTable;
use tsuml_core::model::Span;

/// Identifier for a scope: the id of the syntax node that opens it.
type ScopeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Namespace,
    Function,
    Block,
    Class,
    Enum,
    /// Interfaces and type aliases, which only scope their type parameters.
    Type,
}

impl ScopeKind {
    /// Scopes that receive `var` declarations from nested blocks.
    pub fn hoists_var(&self) -> bool {
        matches!(
            self,
            ScopeKind::File | ScopeKind::Namespace | ScopeKind::Function
        )
    }

    /// Scopes whose member table is visible to plain name lookup.
    fn exposes_members(&self) -> bool {
        matches!(self, ScopeKind::Namespace | ScopeKind::Enum)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent_id: Option<ScopeId>,
    pub kind: ScopeKind,
    pub locals: SymbolTable,
}

/// Where a declaration name token was registered.
#[derive(Debug, Clone)]
pub struct DeclarationSite {
    pub name: SmolStr,
    pub binding: Binding,
    /// Scope holding the name as a local.
    pub scope: Option<ScopeId>,
    /// Class, interface, enum, namespace or object literal holding the name as a member.
    pub owner: Option<usize>,
}

#[derive(Debug, Default, Clone)]
pub struct ScopeManager {
    scopes: HashMap<ScopeId, Scope>,
    /// Member tables keyed by owner node id.
    members: HashMap<usize, SymbolTable>,
    /// Declaration sites keyed by the start byte of their name.
    sites: HashMap<usize, DeclarationSite>,
    /// Start bytes of name tokens that declare something without a site.
    declaration_tokens: HashSet<usize>,
    imports: HashSet<usize>,
}

impl ScopeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_scope(&mut self, node_id: usize, parent_id: Option<ScopeId>, kind: ScopeKind) {
        self.scopes.insert(
            node_id,
            Scope {
                id: node_id,
                parent_id,
                kind,
                locals: SymbolTable::default(),
            },
        );
    }

    /// Marks a node as able to hold members, even before any is declared.
    pub fn register_owner(&mut self, node_id: usize) {
        self.members.entry(node_id).or_default();
    }

    pub fn mark_import(&mut self, declaration: usize) {
        self.imports.insert(declaration);
    }

    pub fn mark_declaration_token(&mut self, start_byte: usize) {
        self.declaration_tokens.insert(start_byte);
    }

    pub fn add_local(&mut self, scope_id: ScopeId, name: SmolStr, binding: Binding) {
        if let Some(scope) = self.scopes.get_mut(&scope_id) {
            scope.locals.insert(name.clone(), binding);
        }
        self.record_site(name, binding, Some(scope_id), None);
    }

    pub fn add_member(&mut self, owner: usize, name: SmolStr, binding: Binding) {
        self.members
            .entry(owner)
            .or_default()
            .insert(name.clone(), binding);
        self.record_site(name, binding, None, Some(owner));
    }

    /// Parameter properties are both constructor locals and class members.
    pub fn add_local_member(&mut self, scope_id: ScopeId, owner: usize, name: SmolStr, binding: Binding) {
        if let Some(scope) = self.scopes.get_mut(&scope_id) {
            scope.locals.insert(name.clone(), binding);
        }
        self.members
            .entry(owner)
            .or_default()
            .insert(name.clone(), binding);
        self.record_site(name, binding, Some(scope_id), Some(owner));
    }

    fn record_site(&mut self, name: SmolStr, binding: Binding, scope: Option<ScopeId>, owner: Option<usize>) {
        self.sites
            .entry(binding.name_span.start)
            .or_insert(DeclarationSite {
                name,
                binding,
                scope,
                owner,
            });
    }

    pub fn scope(&self, scope_id: ScopeId) -> Option<&Scope> {
        self.scopes.get(&scope_id)
    }

    pub fn get_scope_id(&self, node_id: usize) -> Option<ScopeId> {
        self.scopes.contains_key(&node_id).then_some(node_id)
    }

    /// Looks a name up starting from a scope and walking outwards.
    pub fn lookup_symbol(&self, start_scope_id: ScopeId, name: &str) -> Option<&[Binding]> {
        let mut current_scope_id = Some(start_scope_id);
        while let Some(scope_id) = current_scope_id {
            let scope = self.scopes.get(&scope_id)?;
            if let Some(bindings) = scope.locals.get(name) {
                return Some(bindings);
            }
            if scope.kind.exposes_members() {
                if let Some(bindings) = self.member(scope_id, name) {
                    return Some(bindings);
                }
            }
            current_scope_id = scope.parent_id;
        }
        None
    }

    pub fn member(&self, owner: usize, name: &str) -> Option<&[Binding]> {
        self.members.get(&owner).and_then(|t| t.get(name))
    }

    pub fn is_owner(&self, node_id: usize) -> bool {
        self.members.contains_key(&node_id)
    }

    pub fn is_import(&self, declaration: usize) -> bool {
        self.imports.contains(&declaration)
    }

    /// Owners declaring a member called `name`.
    pub fn owners_with_member<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.members
            .iter()
            .filter(move |(_, table)| table.get(name).is_some())
            .map(|(owner, _)| *owner)
    }

    /// The declaration site whose name token is exactly `name_span`.
    pub fn site(&self, name_span: &Span) -> Option<&DeclarationSite> {
        self.sites
            .get(&name_span.start)
            .filter(|site| site.binding.name_span == *name_span)
    }

    pub fn is_declaration_token(&self, start_byte: usize) -> bool {
        self.sites.contains_key(&start_byte) || self.declaration_tokens.contains(&start_byte)
    }
}

impl ScopeTable for ScopeManager {
    fn is_local(&self, container: usize, name: &str, declaration: &Span) -> bool {
        self.scopes
            .get(&container)
            .is_some_and(|scope| scope.locals.declares(name, declaration))
    }
}
