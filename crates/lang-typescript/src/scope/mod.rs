//! Lexical scopes and member tables for one parsed file.

pub mod builder;
pub mod manager;
pub mod table;

pub use builder::ScopeBuilder;
pub use manager::{DeclarationSite, Scope, ScopeKind, ScopeManager};
pub use table::{Binding, SymbolTable};
