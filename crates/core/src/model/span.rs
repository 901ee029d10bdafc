use serde::{Deserialize, Serialize};

/// Zero-based line/column range, as reported by the parser.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

/// A half-open byte range `[start, end)` together with its line/column range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub range: Range,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A source location handed to consumers for "jump to" navigation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct FilePosition {
    pub file_name: String,
    pub line: usize,
    pub column: usize,
}

impl FilePosition {
    pub fn at(file_name: &str, span: &Span) -> Self {
        Self {
            file_name: file_name.to_string(),
            line: span.range.start_line,
            column: span.range.start_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span {
            start,
            end,
            range: Range::default(),
        }
    }

    #[test]
    fn containment_is_half_open() {
        let outer = span(10, 20);
        assert!(outer.contains_offset(10));
        assert!(outer.contains_offset(19));
        assert!(!outer.contains_offset(20));
        assert!(outer.contains(&span(12, 20)));
        assert!(!outer.contains(&span(9, 12)));
    }
}
