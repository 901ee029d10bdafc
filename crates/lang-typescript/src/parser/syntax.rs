//! Node-kind vocabulary of the TypeScript grammar and small tree helpers
//! shared by the scope builder, classifier and identity resolver.

use smol_str::SmolStr;
use tree_sitter::Node;

/// Node name given to class constructors.
pub const CONSTRUCTOR_NAME: &str = "__constructor";
/// Name given to anonymous default-exported functions and classes.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// Declarations whose `name` field carries their identifier.
const NAMED_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "interface_declaration",
    "enum_declaration",
    "type_alias_declaration",
    "internal_module",
    "module",
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "function_expression",
    "generator_function",
    "method_definition",
    "method_signature",
    "abstract_method_signature",
    "public_field_definition",
    "property_signature",
    "variable_declarator",
    "enum_assignment",
];

pub fn text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub fn is_identifier_like(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "type_identifier"
            | "property_identifier"
            | "private_property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
    )
}

/// Nodes whose `body` is executable code.
pub fn is_function_like(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

/// Callable shapes without a body; their parameters are declarations only.
pub fn is_signature(kind: &str) -> bool {
    matches!(
        kind,
        "function_signature"
            | "method_signature"
            | "abstract_method_signature"
            | "call_signature"
            | "construct_signature"
            | "function_type"
            | "constructor_type"
    )
}

pub fn is_class_like(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration" | "abstract_class_declaration" | "class"
    )
}

pub fn is_constructor(node: &Node, source: &str) -> bool {
    node.kind() == "method_definition"
        && node
            .child_by_field_name("name")
            .is_some_and(|name| text(&name, source) == "constructor")
}

/// True when `node` has a direct child (named or anonymous) of `kind`.
pub fn has_child_kind(node: &Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == kind)
}

pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn first_named_child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

/// True when `node` is directly wrapped by an `export` statement.
pub fn is_exported(node: &Node) -> bool {
    node.parent().is_some_and(|p| p.kind() == "export_statement")
}

/// True for the expression of `export default <expr>`.
pub fn is_default_export(node: &Node) -> bool {
    node.parent().is_some_and(|p| {
        p.kind() == "export_statement" && p.child_by_field_name("value") == Some(*node)
    })
}

/// Parameters marked with an accessibility modifier or `readonly` also
/// declare a class property.
pub fn is_property_parameter(node: &Node) -> bool {
    matches!(node.kind(), "required_parameter" | "optional_parameter")
        && (has_child_kind(node, "accessibility_modifier") || has_child_kind(node, "readonly"))
}

pub fn has_accessibility(node: &Node, source: &str, modifier: &str) -> bool {
    first_named_child_of_kind(node, "accessibility_modifier")
        .is_some_and(|m| text(&m, source) == modifier)
}

/// The class a constructor parameter belongs to.
pub fn parameter_owner_class<'t>(parameter: &Node<'t>) -> Option<Node<'t>> {
    let method = parameter.parent()?.parent()?;
    if method.kind() != "method_definition" {
        return None;
    }
    let class = method.parent()?.parent()?;
    is_class_like(class.kind()).then_some(class)
}

/// Node that owns the member declared by `member` (a method, field or
/// signature): a class, an interface, an object type or an object literal.
pub fn member_owner<'t>(member: &Node<'t>) -> Option<Node<'t>> {
    let parent = member.parent()?;
    match parent.kind() {
        "class_body" | "interface_body" => parent.parent(),
        "object_type" | "object" => Some(parent),
        _ => None,
    }
}

/// A declared name: the text, plus the identifier node unless the whole
/// declaration stands in for it.
#[derive(Debug, Clone)]
pub struct DeclaredName<'t> {
    pub name: SmolStr,
    pub node: Option<Node<'t>>,
}

fn identifier_name<'t>(node: Node<'t>, source: &str) -> Option<DeclaredName<'t>> {
    is_identifier_like(node.kind()).then(|| DeclaredName {
        name: SmolStr::new(text(&node, source)),
        node: Some(node),
    })
}

/// Name of a declaration-shaped node. Non-identifier names (strings,
/// computed keys, dotted namespaces) yield `None`.
pub fn declared_name<'t>(node: &Node<'t>, source: &str) -> Option<DeclaredName<'t>> {
    let kind = node.kind();
    if is_constructor(node, source) {
        return Some(DeclaredName {
            name: SmolStr::new_static(CONSTRUCTOR_NAME),
            node: node.child_by_field_name("name"),
        });
    }
    match kind {
        "required_parameter" | "optional_parameter" => {
            identifier_name(node.child_by_field_name("pattern")?, source)
        }
        _ if NAMED_DECLARATIONS.contains(&kind) => match node.child_by_field_name("name") {
            Some(name) => identifier_name(name, source),
            None if is_default_export(node) => Some(DeclaredName {
                name: SmolStr::new_static(DEFAULT_EXPORT_NAME),
                node: None,
            }),
            None => None,
        },
        _ => None,
    }
}

/// Segment a container contributes to the ids of what it encloses: its
/// declared name, or the dotted name of `namespace A.B`.
pub fn path_segment(node: &Node, source: &str) -> Option<SmolStr> {
    if let Some(declared) = declared_name(node, source) {
        return Some(declared.name);
    }
    if !matches!(node.kind(), "internal_module" | "module") {
        return None;
    }
    node.child_by_field_name("name")
        .filter(|name| name.kind() == "nested_identifier")
        .map(|name| SmolStr::new(text(&name, source)))
}

/// Object literals and class expressions that hold members but are not named
/// by the declaration they initialise.
pub fn is_anonymous_owner(node: &Node, source: &str) -> bool {
    let unnamed = match node.kind() {
        "object" => true,
        "class" => node.child_by_field_name("name").is_none() && !is_default_export(node),
        _ => false,
    };
    unnamed
        && !node.parent().is_some_and(|parent| {
            matches!(parent.kind(), "variable_declarator" | "public_field_definition")
                && parent.child_by_field_name("value") == Some(*node)
                && declared_name(&parent, source).is_some()
        })
}

/// One name introduced by a binding target.
#[derive(Debug, Clone, Copy)]
pub struct BindingTarget<'t> {
    /// The node standing for the whole binding (for patterns, the element).
    pub declaration: Node<'t>,
    pub name: Node<'t>,
}

/// Flattens a binding target (an identifier or a destructuring pattern)
/// into the names it introduces, in source order.
pub fn collect_bindings<'t>(target: Node<'t>, declaration: Node<'t>, out: &mut Vec<BindingTarget<'t>>) {
    match target.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => out.push(BindingTarget {
            declaration,
            name: target,
        }),
        "object_pattern" | "array_pattern" => {
            for element in named_children(&target) {
                match element.kind() {
                    "identifier" | "shorthand_property_identifier_pattern" => {
                        out.push(BindingTarget {
                            declaration: element,
                            name: element,
                        })
                    }
                    "pair_pattern" => {
                        if let Some(value) = element.child_by_field_name("value") {
                            collect_bindings(value, element, out);
                        }
                    }
                    "object_assignment_pattern" | "assignment_pattern" => {
                        if let Some(left) = element.child_by_field_name("left") {
                            collect_bindings(left, element, out);
                        }
                    }
                    "rest_pattern" => {
                        if let Some(inner) = named_children(&element).into_iter().next() {
                            collect_bindings(inner, element, out);
                        }
                    }
                    "object_pattern" | "array_pattern" => collect_bindings(element, element, out),
                    _ => {}
                }
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = target.child_by_field_name("left") {
                collect_bindings(left, declaration, out);
            }
        }
        "rest_pattern" => {
            if let Some(inner) = named_children(&target).into_iter().next() {
                collect_bindings(inner, declaration, out);
            }
        }
        _ => {}
    }
}

pub fn bindings_of<'t>(target: Node<'t>, declaration: Node<'t>) -> Vec<BindingTarget<'t>> {
    let mut out = Vec::new();
    collect_bindings(target, declaration, &mut out);
    out
}

/// Module specifier text of an import statement, without quotes.
pub fn import_source<'a>(statement: &Node, source: &'a str) -> Option<&'a str> {
    let string = statement.child_by_field_name("source")?;
    Some(
        first_named_child_of_kind(&string, "string_fragment")
            .map(|fragment| text(&fragment, source))
            .unwrap_or(""),
    )
}

/// Label used for a scope anchor: `<name or kind>@<line>:<column>`, 1-based.
pub fn anchor_label(node: &Node, source: &str) -> String {
    let position = node.start_position();
    let label = path_segment(node, source)
        .map(|name| name.to_string())
        .unwrap_or_else(|| node.kind().to_string());
    format!("{}@{}:{}", label, position.row + 1, position.column + 1)
}
