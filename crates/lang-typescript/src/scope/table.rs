use smol_str::SmolStr;
use std::collections::HashMap;
use tsuml_core::model::Span;

/// One declared name: the syntax node that declares it and the span of its
/// name token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub declaration: usize,
    pub name_span: Span,
}

/// Names declared in a scope or member table. A name can carry several
/// bindings (overloads, merged declarations), kept in declaration order.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashMap<SmolStr, Vec<Binding>>,
}

impl SymbolTable {
    pub fn insert(&mut self, name: SmolStr, binding: Binding) {
        let bindings = self.symbols.entry(name).or_default();
        if !bindings.contains(&binding) {
            bindings.push(binding);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Binding]> {
        self.symbols.get(name).map(Vec::as_slice)
    }

    pub fn declares(&self, name: &str, name_span: &Span) -> bool {
        self.get(name)
            .is_some_and(|b| b.iter().any(|binding| binding.name_span == *name_span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsuml_core::model::Range;

    fn binding(declaration: usize, start: usize) -> Binding {
        Binding {
            declaration,
            name_span: Span {
                start,
                end: start + 1,
                range: Range::default(),
            },
        }
    }

    #[test]
    fn keeps_merged_bindings_in_order_without_duplicates() {
        let mut table = SymbolTable::default();
        table.insert("f".into(), binding(1, 10));
        table.insert("f".into(), binding(2, 30));
        table.insert("f".into(), binding(1, 10));
        assert_eq!(table.get("f").unwrap(), &[binding(1, 10), binding(2, 30)]);
        assert!(table.declares("f", &binding(2, 30).name_span));
        assert!(!table.declares("g", &binding(2, 30).name_span));
    }
}
