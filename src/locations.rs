//! Source locations
//!
//! Every element, attribute and diagnostic produced while reading a CSDL
//! document carries a [`Location`]: the document path plus a 1-based line
//! and column.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Position of a node inside a source document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// Document path or identifier (empty for in-memory sources)
    pub document: Arc<str>,
    /// 1-based line number (0 when unknown)
    pub line: usize,
    /// 1-based column number, counted in characters (0 when unknown)
    pub column: usize,
}

impl Location {
    /// Create a new location
    pub fn new(document: Arc<str>, line: usize, column: usize) -> Self {
        Self {
            document,
            line,
            column,
        }
    }

    /// A location for nodes that did not come from a document
    pub fn unknown() -> Self {
        Self {
            document: Arc::from(""),
            line: 0,
            column: 0,
        }
    }

    /// Whether this location points into a real document
    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.document.is_empty() {
            write!(f, "({}, {})", self.line, self.column)
        } else {
            write!(f, "{} ({}, {})", self.document, self.line, self.column)
        }
    }
}

/// Maps byte offsets of a source text to line/column locations
#[derive(Debug, Clone)]
pub struct LineIndex {
    document: Arc<str>,
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `source`
    pub fn new(document: impl Into<Arc<str>>, source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            document: document.into(),
            line_starts,
        }
    }

    /// The document identifier used in produced locations
    pub fn document(&self) -> &Arc<str> {
        &self.document
    }

    /// Resolve a byte offset into a location
    pub fn location(&self, source: &str, offset: usize) -> Location {
        let offset = offset.min(source.len());
        let line = self.line_starts.partition_point(|start| *start <= offset);
        let line_start = self.line_starts[line - 1];
        // Offsets produced by the reader always sit on a char boundary, but
        // fall back to a byte count if that ever fails to hold.
        let column = source
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - line_start);
        Location::new(self.document.clone(), line, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::new(Arc::from("model.csdl"), 3, 7);
        assert_eq!(loc.to_string(), "model.csdl (3, 7)");

        let loc = Location::new(Arc::from(""), 1, 1);
        assert_eq!(loc.to_string(), "(1, 1)");
    }

    #[test]
    fn test_unknown_location() {
        let loc = Location::unknown();
        assert!(!loc.is_known());
        assert_eq!(loc, Location::default());
    }

    #[test]
    fn test_line_index() {
        let source = "<a>\n  <b/>\n</a>";
        let index = LineIndex::new("doc", source);

        let loc = index.location(source, 0);
        assert_eq!((loc.line, loc.column), (1, 1));

        let loc = index.location(source, 6);
        assert_eq!((loc.line, loc.column), (2, 3));

        let loc = index.location(source, source.len());
        assert_eq!((loc.line, loc.column), (3, 5));
    }

    #[test]
    fn test_line_index_counts_characters() {
        let source = "<é attr='x'/>";
        let index = LineIndex::new("doc", source);
        // 'é' is two bytes but a single column
        let loc = index.location(source, 4);
        assert_eq!(loc.column, 4);
    }
}
