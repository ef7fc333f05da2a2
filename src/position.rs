//! Source positions for messages, markers, and tree nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in a source document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Absolute offset into the source, when the producer tracked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether this point lies at or before `other` in document order.
    ///
    /// Only (line, column) participate; offsets are advisory and may be
    /// missing on either side.
    pub fn at_or_before(&self, other: &Point) -> bool {
        self.line < other.line || (self.line == other.line && self.column <= other.column)
    }

    /// Whether this point lies strictly before `other` in document order.
    pub fn before(&self, other: &Point) -> bool {
        self.line < other.line || (self.line == other.line && self.column < other.column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source region with a known start and an optional end
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
}

impl Span {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// A region known only by its start.
    pub fn at(start: Point) -> Self {
        Self { start, end: None }
    }

    /// Shorthand for a fully specified region.
    pub fn between(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self::new(
            Point::new(start_line, start_column),
            Point::new(end_line, end_column),
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_display() {
        assert_eq!(format!("{}", Point::new(3, 1)), "3:1");
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::between(1, 1, 1, 16)), "1:1-1:16");
        assert_eq!(format!("{}", Span::at(Point::new(5, 1))), "5:1");
    }

    #[test]
    fn test_at_or_before() {
        let early = Point::new(1, 5);
        let late = Point::new(2, 1);
        assert!(early.at_or_before(&late));
        assert!(!late.at_or_before(&early));

        // Same line compares by column, ties count as "at".
        assert!(Point::new(3, 1).at_or_before(&Point::new(3, 1)));
        assert!(Point::new(3, 1).at_or_before(&Point::new(3, 2)));
        assert!(!Point::new(3, 2).at_or_before(&Point::new(3, 1)));
    }

    #[test]
    fn test_before_is_strict() {
        assert!(Point::new(3, 1).before(&Point::new(3, 2)));
        assert!(!Point::new(3, 1).before(&Point::new(3, 1)));
    }

    #[test]
    fn test_offset_does_not_affect_comparison() {
        let with_offset = Point::new(2, 1).with_offset(40);
        let without = Point::new(2, 1);
        assert!(with_offset.at_or_before(&without));
        assert!(without.at_or_before(&with_offset));
    }
}
