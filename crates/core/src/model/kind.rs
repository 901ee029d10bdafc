use serde::{Deserialize, Serialize};
use std::fmt;

/// The declaration forms that can become graph nodes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "constructor")]
    Constructor,
    #[serde(rename = "property")]
    Property,
    #[serde(rename = "variable")]
    Variable,
    /// Constructor parameter properties, or any parameter when parameter tracking is on.
    #[serde(rename = "parameter")]
    Parameter,
    #[serde(rename = "binding element")]
    BindingElement,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "enum member")]
    EnumMember,
    #[serde(rename = "module")]
    Module,
    #[serde(rename = "type alias")]
    TypeAlias,
    #[serde(rename = "import")]
    Import,
    #[serde(rename = "import alias")]
    ImportAlias,
}

impl DeclarationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Property => "property",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::BindingElement => "binding element",
            DeclarationKind::Enum => "enum",
            DeclarationKind::EnumMember => "enum member",
            DeclarationKind::Module => "module",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Import => "import",
            DeclarationKind::ImportAlias => "import alias",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
