pub mod analyzer;
pub mod classify;
pub mod identity;
pub mod parser;
pub mod references;
pub mod scope;

pub use analyzer::{FileAnalysis, FrameworkAliasUsage, TypeScriptAnalyzer};
pub use classify::{ClassifiedFile, Classifier, SourceDeclaration};
pub use parser::{ParsedFile, SourceLanguage, TypeScriptParser};
