use once_cell::sync::Lazy;
use std::path::Path;
use tracing::debug;
use tree_sitter::{Language, Node, Parser, Tree};
use tsuml_core::error::{GraphError, Result};
use tsuml_core::model::{Range, Span};

pub mod syntax;

static TYPESCRIPT: Lazy<Language> =
    Lazy::new(|| tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into());
static TSX: Lazy<Language> = Lazy::new(|| tree_sitter_typescript::LANGUAGE_TSX.into());

/// Grammar flavour, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    pub fn from_file_name(file_name: &str) -> Self {
        match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some("tsx") | Some("jsx") => SourceLanguage::Tsx,
            _ => SourceLanguage::TypeScript,
        }
    }

    pub fn grammar(&self) -> &'static Language {
        match self {
            SourceLanguage::TypeScript => Lazy::force(&TYPESCRIPT),
            SourceLanguage::Tsx => Lazy::force(&TSX),
        }
    }
}

/// A parsed source file. Declarations and scopes borrow their nodes from here.
pub struct ParsedFile {
    pub file_name: String,
    pub source: String,
    pub tree: Tree,
    pub language: SourceLanguage,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text<'a>(&'a self, node: &Node) -> &'a str {
        syntax::text(node, &self.source)
    }

    /// Path segment used as the root of every declaration id: the file stem,
    /// with any inner dots replaced so ids stay dot-separated.
    pub fn id_root(&self) -> String {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name);
        stem.replace('.', "_")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptParser;

impl TypeScriptParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, file_name: &str, source: &str) -> Result<ParsedFile> {
        let language = SourceLanguage::from_file_name(file_name);
        let mut parser = Parser::new();
        parser
            .set_language(language.grammar())
            .map_err(|e| GraphError::Parsing(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GraphError::Parsing(format!("Failed to parse {}", file_name)))?;

        if tree.root_node().has_error() {
            debug!("{} contains syntax errors; analyzing the recovered tree", file_name);
        }

        Ok(ParsedFile {
            file_name: file_name.to_string(),
            source: source.to_string(),
            tree,
            language,
        })
    }
}

/// Converts a tree-sitter node extent to our span model.
pub fn span_of(node: &Node) -> Span {
    let range = node.range();
    Span {
        start: range.start_byte,
        end: range.end_byte,
        range: Range {
            start_line: range.start_point.row,
            start_col: range.start_point.column,
            end_line: range.end_point.row,
            end_col: range.end_point.column,
        },
    }
}
