//! Scope builder.
//!
//! Walks the whole tree once and registers every declared name, whether or not
//! it ends up as a graph node, so that shadowing is resolved correctly.

use super::manager::{ScopeKind, ScopeManager};
use super::table::Binding;
use crate::parser::syntax::{
    self, DEFAULT_EXPORT_NAME, bindings_of, declared_name, first_named_child_of_kind,
    is_class_like, is_default_export, is_function_like, is_identifier_like,
    is_property_parameter, is_signature, member_owner, named_children, parameter_owner_class,
};
use crate::parser::{ParsedFile, span_of};
use smol_str::SmolStr;
use tree_sitter::Node;

pub struct ScopeBuilder<'a> {
    file: &'a ParsedFile,
    manager: ScopeManager,
}

impl<'a> ScopeBuilder<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self {
            file,
            manager: ScopeManager::new(),
        }
    }

    pub fn build(mut self) -> ScopeManager {
        let root = self.file.root();
        self.manager
            .register_scope(root.id(), None, ScopeKind::File);
        for child in named_children(&root) {
            self.visit_node(child, root.id(), root.id());
        }
        self.manager
    }

    /// `scope` is the innermost enclosing scope, `var_scope` the one that
    /// receives hoisted `var` declarations.
    fn visit_node(&mut self, node: Node<'a>, scope: usize, var_scope: usize) {
        self.register_in_enclosing(node, scope, var_scope);

        let (inner, inner_var) = match self.scope_kind(&node) {
            Some(kind) => {
                self.manager.register_scope(node.id(), Some(scope), kind);
                let hoist = if kind.hoists_var() { node.id() } else { var_scope };
                self.register_in_own(node, node.id(), hoist);
                (node.id(), hoist)
            }
            None => (scope, var_scope),
        };

        for child in named_children(&node) {
            self.visit_node(child, inner, inner_var);
        }
    }

    fn scope_kind(&self, node: &Node) -> Option<ScopeKind> {
        let kind = node.kind();
        if is_function_like(kind) || is_signature(kind) || kind == "class_static_block" {
            return Some(ScopeKind::Function);
        }
        if is_class_like(kind) {
            return Some(ScopeKind::Class);
        }
        match kind {
            "internal_module" | "module" => Some(ScopeKind::Namespace),
            "enum_declaration" => Some(ScopeKind::Enum),
            "interface_declaration" | "type_alias_declaration" => Some(ScopeKind::Type),
            "for_statement" | "for_in_statement" | "catch_clause" | "switch_body" => {
                Some(ScopeKind::Block)
            }
            "statement_block" => {
                let is_body = node.parent().is_some_and(|p| {
                    is_function_like(p.kind())
                        || matches!(
                            p.kind(),
                            "internal_module" | "module" | "catch_clause" | "class_static_block"
                        )
                });
                (!is_body).then_some(ScopeKind::Block)
            }
            _ => None,
        }
    }

    /// Names a node introduces into the scope around it.
    fn register_in_enclosing(&mut self, node: Node<'a>, scope: usize, var_scope: usize) {
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" | "interface_declaration"
            | "enum_declaration" | "internal_module" | "module" => {
                self.manager.register_owner(node.id());
                self.declare_named(node, scope);
            }
            "function_declaration" | "generator_function_declaration" | "function_signature"
            | "type_alias_declaration" => self.declare_named(node, scope),
            "class" | "function_expression" | "generator_function" => {
                if node.kind() == "class" {
                    self.manager.register_owner(node.id());
                }
                if node.child_by_field_name("name").is_none() && is_default_export(&node) {
                    let binding = Binding {
                        declaration: node.id(),
                        name_span: span_of(&node),
                    };
                    self.manager
                        .add_local(scope, SmolStr::new_static(DEFAULT_EXPORT_NAME), binding);
                }
            }
            "variable_declarator" => {
                let statement = node.parent();
                let hoisted = statement.is_some_and(|s| s.kind() == "variable_declaration");
                let exported = statement.is_some_and(|s| is_exported_declaration(&s));
                let target = if hoisted { var_scope } else { scope };
                if let Some(name) = node.child_by_field_name("name") {
                    for binding in bindings_of(name, node) {
                        self.declare(target, exported, binding.name, binding.declaration);
                    }
                }
            }
            "required_parameter" | "optional_parameter" => self.register_parameter(node, scope),
            "type_parameter" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(scope, false, name, node);
                }
            }
            "import_clause" => {
                for child in named_children(&node) {
                    match child.kind() {
                        "identifier" => self.declare_import(scope, child, child),
                        "namespace_import" => {
                            if let Some(name) = first_named_child_of_kind(&child, "identifier") {
                                self.declare_import(scope, name, child);
                            }
                        }
                        "named_imports" => {
                            for specifier in named_children(&child) {
                                let local = specifier
                                    .child_by_field_name("alias")
                                    .or_else(|| specifier.child_by_field_name("name"));
                                if let Some(local) = local {
                                    self.declare_import(scope, local, specifier);
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            "import_require_clause" => {
                if let Some(name) = first_named_child_of_kind(&node, "identifier") {
                    self.declare_import(scope, name, node);
                }
            }
            "import_alias" => {
                if let Some(name) = first_named_child_of_kind(&node, "identifier") {
                    self.declare(scope, is_exported_declaration(&node), name, node);
                }
            }
            "method_definition" | "method_signature" | "abstract_method_signature"
            | "public_field_definition" | "property_signature" => self.register_member(node),
            "enum_body" => self.register_enum_members(node),
            "index_signature" | "mapped_type_clause" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.manager.mark_declaration_token(name.start_byte());
                }
            }
            _ => {}
        }
    }

    /// Names a scope-creating node introduces into its own scope.
    fn register_in_own(&mut self, node: Node<'a>, scope: usize, var_scope: usize) {
        match node.kind() {
            "class" | "function_expression" | "generator_function" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(scope, false, name, node);
                }
            }
            "arrow_function" => {
                if let Some(parameter) = node.child_by_field_name("parameter") {
                    self.declare(scope, false, parameter, parameter);
                }
            }
            "catch_clause" => {
                if let Some(parameter) = node.child_by_field_name("parameter") {
                    for binding in bindings_of(parameter, parameter) {
                        self.declare(scope, false, binding.name, binding.declaration);
                    }
                }
            }
            "for_in_statement" => {
                let Some(kind) = node.child_by_field_name("kind") else {
                    return;
                };
                let target = if self.file.text(&kind) == "var" { var_scope } else { scope };
                if let Some(left) = node.child_by_field_name("left") {
                    for binding in bindings_of(left, left) {
                        self.declare(target, false, binding.name, binding.declaration);
                    }
                }
            }
            _ => {}
        }
    }

    fn register_parameter(&mut self, node: Node<'a>, scope: usize) {
        let Some(pattern) = node.child_by_field_name("pattern") else {
            return;
        };
        if is_property_parameter(&node) && pattern.kind() == "identifier" {
            if let Some(class) = parameter_owner_class(&node) {
                let binding = Binding {
                    declaration: node.id(),
                    name_span: span_of(&pattern),
                };
                let name = SmolStr::new(self.file.text(&pattern));
                self.manager
                    .add_local_member(scope, class.id(), name, binding);
                return;
            }
        }
        for binding in bindings_of(pattern, node) {
            self.declare(scope, false, binding.name, binding.declaration);
        }
    }

    fn register_member(&mut self, node: Node<'a>) {
        let Some(owner) = member_owner(&node).or_else(|| node.parent()) else {
            return;
        };
        self.manager.register_owner(owner.id());
        match declared_name(&node, &self.file.source) {
            Some(declared) => {
                if let Some(name_node) = declared.node {
                    let binding = Binding {
                        declaration: node.id(),
                        name_span: span_of(&name_node),
                    };
                    self.manager.add_member(owner.id(), declared.name, binding);
                }
            }
            None => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.manager.mark_declaration_token(name.start_byte());
                }
            }
        }
    }

    fn register_enum_members(&mut self, body: Node<'a>) {
        let Some(owner) = body.parent() else {
            return;
        };
        for member in named_children(&body) {
            let (name, declaration) = match member.kind() {
                "enum_assignment" => match member.child_by_field_name("name") {
                    Some(name) => (name, member),
                    None => continue,
                },
                _ => (member, member),
            };
            if !is_identifier_like(name.kind()) {
                self.manager.mark_declaration_token(name.start_byte());
                continue;
            }
            let binding = Binding {
                declaration: declaration.id(),
                name_span: span_of(&name),
            };
            self.manager
                .add_member(owner.id(), SmolStr::new(self.file.text(&name)), binding);
        }
    }

    fn declare_named(&mut self, node: Node<'a>, scope: usize) {
        if let Some(name) = node.child_by_field_name("name") {
            if is_identifier_like(name.kind()) {
                self.declare(scope, is_exported_declaration(&node), name, node);
            }
        }
    }

    fn declare_import(&mut self, scope: usize, name: Node<'a>, declaration: Node<'a>) {
        self.manager.mark_import(declaration.id());
        self.declare(scope, false, name, declaration);
    }

    /// Exported names inside a namespace become its members; everything else
    /// is a local of `scope`.
    fn declare(&mut self, scope: usize, exported: bool, name: Node<'a>, declaration: Node<'a>) {
        let binding = Binding {
            declaration: declaration.id(),
            name_span: span_of(&name),
        };
        let text = SmolStr::new(self.file.text(&name));
        let in_namespace = self
            .manager
            .scope(scope)
            .is_some_and(|s| s.kind == ScopeKind::Namespace);
        if exported && in_namespace {
            self.manager.add_member(scope, text, binding);
        } else {
            self.manager.add_local(scope, text, binding);
        }
    }
}

fn is_exported_declaration(node: &Node) -> bool {
    match node.parent() {
        Some(parent) if parent.kind() == "ambient_declaration" => syntax::is_exported(&parent),
        _ => syntax::is_exported(node),
    }
}
