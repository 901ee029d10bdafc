//! Declaration classification.
//!
//! A single pre-order walk decides which declarations become graph nodes.
//! Containers (classes, interfaces, enums, namespaces, type aliases) and
//! functions always count; variables and properties only outside executable
//! bodies; parameters only when they are parameter properties or parameter
//! tracking is on.

pub mod context;

use crate::parser::syntax::{
    bindings_of, declared_name, first_named_child_of_kind, has_accessibility, import_source,
    is_constructor, is_exported, is_identifier_like, is_property_parameter, named_children,
    parameter_owner_class, text,
};
use crate::parser::{ParsedFile, span_of};
use context::TraversalContext;
use smol_str::SmolStr;
use tree_sitter::Node;
use tsuml_core::config::GraphConfig;
use tsuml_core::model::{DeclarationKind, Span};

/// A declaration accepted as a graph node candidate.
#[derive(Debug, Clone)]
pub struct SourceDeclaration<'tree> {
    pub kind: DeclarationKind,
    pub name: SmolStr,
    /// The node spanning the whole declaration.
    pub node: Node<'tree>,
    pub name_span: Span,
    pub span: Span,
}

impl<'tree> SourceDeclaration<'tree> {
    /// Syntactic ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'tree>> + use<'tree> {
        std::iter::successors(self.node.parent(), |n| n.parent())
    }
}

/// The framework namespace import (`import * as React from "react"`),
/// which is tracked apart from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkAlias {
    pub name: SmolStr,
    pub name_span: Span,
}

#[derive(Debug)]
pub struct ClassifiedFile<'tree> {
    pub declarations: Vec<SourceDeclaration<'tree>>,
    pub framework_alias: Option<FrameworkAlias>,
    pub has_jsx: bool,
}

pub struct Classifier<'a> {
    config: &'a GraphConfig,
    file: &'a ParsedFile,
    declarations: Vec<SourceDeclaration<'a>>,
    framework_alias: Option<FrameworkAlias>,
    has_jsx: bool,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a GraphConfig, file: &'a ParsedFile) -> Self {
        Self {
            config,
            file,
            declarations: Vec::new(),
            framework_alias: None,
            has_jsx: false,
        }
    }

    pub fn classify(mut self) -> ClassifiedFile<'a> {
        let root = self.file.root();
        self.visit_children(root, TraversalContext::default());
        ClassifiedFile {
            declarations: self.declarations,
            framework_alias: self.framework_alias,
            has_jsx: self.has_jsx,
        }
    }

    fn visit(&mut self, node: Node<'a>, ctx: TraversalContext) {
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" | "class" => {
                self.record_declared(DeclarationKind::Class, node);
                self.visit_children(node, ctx);
            }
            "interface_declaration" => {
                self.record_declared(DeclarationKind::Interface, node);
                self.visit_children(node, ctx.skipping_parameters());
            }
            "type_alias_declaration" => {
                self.record_declared(DeclarationKind::TypeAlias, node);
                self.visit_children(node, ctx);
            }
            "enum_declaration" => {
                self.record_declared(DeclarationKind::Enum, node);
                self.visit_children(node, ctx);
            }
            "enum_body" => self.visit_enum_body(node, ctx),
            "internal_module" | "module" => {
                self.record_declared(DeclarationKind::Module, node);
                self.visit_children(node, ctx);
            }
            "function_declaration" | "generator_function_declaration" | "function_expression"
            | "generator_function" => {
                self.record_declared(DeclarationKind::Function, node);
                self.visit_callable(node, ctx);
            }
            "function_signature" | "method_signature" => {
                let kind = if node.kind() == "function_signature" {
                    DeclarationKind::Function
                } else {
                    DeclarationKind::Method
                };
                self.record_declared(kind, node);
                self.visit_children(node, ctx);
            }
            "abstract_method_signature" => {
                self.record_declared(DeclarationKind::Method, node);
                self.visit_children(node, ctx.skipping_parameters());
            }
            "method_definition" => {
                let kind = if is_constructor(&node, &self.file.source) {
                    DeclarationKind::Constructor
                } else {
                    DeclarationKind::Method
                };
                self.record_declared(kind, node);
                self.visit_callable(node, ctx);
            }
            "arrow_function" => self.visit_callable(node, ctx),
            "class_static_block" => self.visit_children(node, ctx.entering_body()),
            "public_field_definition" | "property_signature" => {
                if ctx.admits_variables() {
                    self.record_declared(DeclarationKind::Property, node);
                }
                self.visit_children(node, ctx);
            }
            "function_type" | "constructor_type" | "index_signature" => {
                self.visit_children(node, ctx.skipping_parameters());
            }
            "required_parameter" | "optional_parameter" => self.visit_parameter(node, ctx),
            "variable_declarator" => {
                if let Some(name) = node.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        if ctx.admits_variables() {
                            self.record(DeclarationKind::Variable, node, name);
                        }
                    } else {
                        self.record_bindings(name, node, ctx);
                    }
                }
                self.visit_children(node, ctx);
            }
            "for_in_statement" => {
                if node.child_by_field_name("kind").is_some() {
                    if let Some(left) = node.child_by_field_name("left") {
                        if left.kind() == "identifier" {
                            if ctx.admits_variables() {
                                self.record(DeclarationKind::Variable, left, left);
                            }
                        } else {
                            self.record_bindings(left, left, ctx);
                        }
                    }
                }
                self.visit_children(node, ctx);
            }
            "import_statement" => self.visit_import(node),
            "import_alias" => {
                if !is_exported(&node) {
                    if let Some(name) = first_named_child_of_kind(&node, "identifier") {
                        self.record(DeclarationKind::ImportAlias, node, name);
                    }
                }
            }
            "catch_clause" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body, ctx);
                }
            }
            "jsx_element" | "jsx_self_closing_element" => {
                self.has_jsx = true;
                self.visit_children(node, ctx);
            }
            _ => self.visit_children(node, ctx),
        }
    }

    fn visit_children(&mut self, node: Node<'a>, ctx: TraversalContext) {
        for child in named_children(&node) {
            self.visit(child, ctx);
        }
    }

    /// Everything but the body keeps the caller's context.
    fn visit_callable(&mut self, node: Node<'a>, ctx: TraversalContext) {
        let body = node.child_by_field_name("body");
        let lone_parameter = node.child_by_field_name("parameter");
        for child in named_children(&node) {
            if Some(child) == body {
                self.visit(child, ctx.entering_body());
            } else if Some(child) == lone_parameter {
                if self.tracks_parameters(ctx) && child.kind() == "identifier" {
                    self.record(DeclarationKind::Parameter, child, child);
                }
            } else {
                self.visit(child, ctx);
            }
        }
    }

    fn tracks_parameters(&self, ctx: TraversalContext) -> bool {
        self.config.track_parameters && !ctx.skip_parameters
    }

    fn visit_parameter(&mut self, node: Node<'a>, ctx: TraversalContext) {
        let property = is_property_parameter(&node);
        let tracked = self.tracks_parameters(ctx) && !property;
        if let Some(pattern) = node.child_by_field_name("pattern") {
            if pattern.kind() == "identifier" {
                let accepted = if property {
                    ctx.admits_variables() && parameter_owner_class(&node).is_some()
                } else {
                    tracked && !has_accessibility(&node, &self.file.source, "public")
                };
                if accepted {
                    self.record(DeclarationKind::Parameter, node, pattern);
                }
            } else {
                let pattern_ctx = if tracked {
                    ctx
                } else {
                    ctx.skipping_binding_elements()
                };
                self.record_bindings(pattern, node, pattern_ctx);
            }
        }
        self.visit_children(node, ctx);
    }

    fn visit_enum_body(&mut self, body: Node<'a>, ctx: TraversalContext) {
        for member in named_children(&body) {
            match member.kind() {
                "enum_assignment" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        self.record(DeclarationKind::EnumMember, member, name);
                    }
                    if let Some(value) = member.child_by_field_name("value") {
                        self.visit(value, ctx);
                    }
                }
                "property_identifier" => self.record(DeclarationKind::EnumMember, member, member),
                _ => self.visit(member, ctx),
            }
        }
    }

    fn visit_import(&mut self, statement: Node<'a>) {
        let from_framework = import_source(&statement, &self.file.source)
            .is_some_and(|module| self.config.is_framework_module(module));

        for clause in named_children(&statement) {
            match clause.kind() {
                "import_clause" => {
                    for child in named_children(&clause) {
                        match child.kind() {
                            "identifier" => self.record(DeclarationKind::Import, child, child),
                            "namespace_import" => {
                                let Some(name) = first_named_child_of_kind(&child, "identifier")
                                else {
                                    continue;
                                };
                                let alias = text(&name, &self.file.source);
                                if from_framework && alias == self.config.framework_namespace {
                                    self.framework_alias = Some(FrameworkAlias {
                                        name: SmolStr::new(alias),
                                        name_span: span_of(&name),
                                    });
                                } else {
                                    self.record(DeclarationKind::Import, child, name);
                                }
                            }
                            "named_imports" => {
                                for specifier in named_children(&child) {
                                    let local = specifier
                                        .child_by_field_name("alias")
                                        .or_else(|| specifier.child_by_field_name("name"));
                                    if let Some(local) = local {
                                        self.record(DeclarationKind::Import, specifier, local);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                "import_require_clause" => {
                    if let Some(name) = first_named_child_of_kind(&clause, "identifier") {
                        self.record(DeclarationKind::ImportAlias, clause, name);
                    }
                }
                _ => {}
            }
        }
    }

    fn record_bindings(&mut self, target: Node<'a>, declaration: Node<'a>, ctx: TraversalContext) {
        if !ctx.admits_binding_elements() {
            return;
        }
        for binding in bindings_of(target, declaration) {
            self.record(
                DeclarationKind::BindingElement,
                binding.declaration,
                binding.name,
            );
        }
    }

    /// Records a declaration whose name lives in its `name` field; anonymous
    /// default exports use the whole node as their name.
    fn record_declared(&mut self, kind: DeclarationKind, node: Node<'a>) {
        let Some(declared) = declared_name(&node, &self.file.source) else {
            return;
        };
        let name_span = declared
            .node
            .map(|n| span_of(&n))
            .unwrap_or_else(|| span_of(&node));
        self.declarations.push(SourceDeclaration {
            kind,
            name: declared.name,
            node,
            name_span,
            span: span_of(&node),
        });
    }

    fn record(&mut self, kind: DeclarationKind, node: Node<'a>, name: Node<'a>) {
        if !is_identifier_like(name.kind()) {
            return;
        }
        self.declarations.push(SourceDeclaration {
            kind,
            name: SmolStr::new(text(&name, &self.file.source)),
            node,
            name_span: span_of(&name),
            span: span_of(&node),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TypeScriptParser;

    fn names(source: &str, config: &GraphConfig) -> Vec<(String, DeclarationKind)> {
        let parsed = TypeScriptParser::new().parse("c.ts", source).unwrap();
        Classifier::new(config, &parsed)
            .classify()
            .declarations
            .iter()
            .map(|d| (d.name.to_string(), d.kind))
            .collect()
    }

    #[test]
    fn locals_inside_bodies_are_not_recorded() {
        let found = names(
            "let top = 1;\nfunction f(a: number) { const inner = 2; class Local { p = 1; } }",
            &GraphConfig::default(),
        );
        assert_eq!(
            found,
            vec![
                ("top".to_string(), DeclarationKind::Variable),
                ("f".to_string(), DeclarationKind::Function),
                ("Local".to_string(), DeclarationKind::Class),
            ]
        );
    }

    #[test]
    fn parameter_tracking_follows_config() {
        let config = GraphConfig {
            track_parameters: true,
            ..GraphConfig::default()
        };
        let found = names(
            "function f(a: number, { b }: any) {}\ninterface I { m(x: number): void }",
            &config,
        );
        let names: Vec<_> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["f", "a", "b", "I", "m"]);
        assert_eq!(found[2].1, DeclarationKind::BindingElement);
    }

    #[test]
    fn anonymous_default_export_is_named_default() {
        let parsed = TypeScriptParser::new()
            .parse("d.ts", "export default class { run() {} }")
            .unwrap();
        let config = GraphConfig::default();
        let classified = Classifier::new(&config, &parsed).classify();
        let class = &classified.declarations[0];
        assert_eq!(class.name, "default");
        assert_eq!(class.name_span, class.span);
        assert_eq!(classified.declarations[1].name, "run");
    }
}
