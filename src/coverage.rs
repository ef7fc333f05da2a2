//! Detection of document regions no longer covered by the tree
//!
//! Transforms that run before message control may replace or drop nodes,
//! leaving stretches of the original source with no tree coverage.
//! Messages pointing into such a stretch describe content that no longer
//! exists and are removed.

use crate::position::Point;
use crate::tree::Node;
use log::debug;

/// Uncovered regions, as half-open (from, to) point pairs.
pub(crate) fn detect_gaps(tree: &Node) -> Vec<(Point, Point)> {
    let mut gaps = Vec::new();
    let mut covered: Option<Point> = None;
    let mut open = false;

    for node in tree.walk() {
        match &node.span {
            None => open = true,
            Some(span) => {
                advance(&mut gaps, &mut covered, &mut open, &span.start);
                if node.children.is_empty() {
                    match &span.end {
                        Some(end) => advance(&mut gaps, &mut covered, &mut open, end),
                        None => open = true,
                    }
                }
            }
        }
    }

    // A root span reaching past the last covered point means trailing
    // content was removed after the root was positioned.
    if let (Some(last), Some(end)) = (
        covered,
        tree.span.as_ref().and_then(|span| span.end.as_ref()),
    ) {
        if last.before(end) {
            gaps.push((last, end.clone()));
        }
    }

    if !gaps.is_empty() {
        debug!("document has {} uncovered region(s)", gaps.len());
    }
    gaps
}

/// Whether `point` falls inside any of `gaps`. Regions are half-open:
/// the last covered point belongs to the gap, the next covered one
/// does not.
pub(crate) fn in_gap(gaps: &[(Point, Point)], point: &Point) -> bool {
    gaps.iter()
        .any(|(from, to)| from.at_or_before(point) && point.before(to))
}

fn advance(
    gaps: &mut Vec<(Point, Point)>,
    covered: &mut Option<Point>,
    open: &mut bool,
    latest: &Point,
) {
    if let Some(point) = covered {
        if latest.at_or_before(point) {
            return;
        }
    }
    if *open {
        if let Some(from) = covered.take() {
            gaps.push((from, latest.clone()));
        }
        *open = false;
    }
    *covered = Some(latest.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Span;

    fn heading(line: usize, end_column: usize) -> Node {
        Node::new("heading").with_children(vec![Node::new("text")
            .with_span(Span::between(line, 1, line, end_column))])
            .with_span(Span::between(line, 1, line, end_column))
    }

    #[test]
    fn test_no_gaps_in_fully_covered_tree() {
        let tree = Node::new("root")
            .with_children(vec![heading(1, 9), heading(3, 21)])
            .with_span(Span::between(1, 1, 3, 21));

        assert!(detect_gaps(&tree).is_empty());
    }

    #[test]
    fn test_gap_opened_by_unpositioned_nodes() {
        // A generated list between two headings carries no positions.
        let tree = Node::new("root")
            .with_children(vec![
                heading(3, 21),
                Node::new("list").with_children(vec![Node::new("listItem")]),
                heading(7, 18),
            ])
            .with_span(Span::between(1, 1, 7, 18));

        let gaps = detect_gaps(&tree);
        assert_eq!(gaps, [(Point::new(3, 21), Point::new(7, 1))]);
        assert!(in_gap(&gaps, &Point::new(5, 1)));
        assert!(in_gap(&gaps, &Point::new(3, 21)));
        assert!(!in_gap(&gaps, &Point::new(7, 1)));
    }

    #[test]
    fn test_trailing_gap_after_removed_content() {
        // The root was positioned before its last child was removed.
        let tree = Node::new("root")
            .with_children(vec![heading(1, 9), heading(3, 21)])
            .with_span(Span::between(1, 1, 5, 39));

        let gaps = detect_gaps(&tree);
        assert_eq!(gaps, [(Point::new(3, 21), Point::new(5, 39))]);
        assert!(in_gap(&gaps, &Point::new(5, 1)));
    }

    #[test]
    fn test_point_at_root_end_is_outside_trailing_gap() {
        let tree = Node::new("root")
            .with_children(vec![heading(1, 9)])
            .with_span(Span::between(1, 1, 2, 1));

        let gaps = detect_gaps(&tree);
        assert_eq!(gaps, [(Point::new(1, 9), Point::new(2, 1))]);
        assert!(!in_gap(&gaps, &Point::new(2, 1)));
    }
}
