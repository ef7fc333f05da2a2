//! Marker extraction from the document tree

use crate::config::Options;
use crate::control::ControlError;
use crate::marker::{MarkerParser, Verb};
use crate::message::Message;
use crate::position::Point;
use crate::tree::Node;
use log::debug;

/// A directive ready to apply to the state timeline
#[derive(Debug, Clone)]
pub(crate) struct Directive {
    pub verb: Verb,
    /// Effective rule names; empty addresses the wildcard state
    pub rule_ids: Vec<String>,
    /// Point the directive takes effect (marker start)
    pub point: Option<Point>,
    /// For `ignore`: end of the next sibling, closing the suppression window
    pub bound: Option<Point>,
}

/// Extraction result: directives in document order, plus any warnings
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub directives: Vec<Directive>,
    pub warnings: Vec<Message>,
}

/// Collect directives from every accepted node, in one pre-order pass.
///
/// The only fatal condition is a marker with an unrecognized keyword;
/// extraction stops at that node.
pub(crate) fn scan(
    tree: &Node,
    kinds: &[String],
    parser: &dyn MarkerParser,
    options: &Options,
) -> Result<Scan, ControlError> {
    let mut out = Scan::default();
    scan_node(tree, None, kinds, parser, options, &mut out)?;
    Ok(out)
}

fn scan_node(
    node: &Node,
    bound: Option<&Point>,
    kinds: &[String],
    parser: &dyn MarkerParser,
    options: &Options,
    out: &mut Scan,
) -> Result<(), ControlError> {
    visit(node, bound, kinds, parser, options, out)?;

    for (index, child) in node.children.iter().enumerate() {
        // The structural boundary for a marker is the end of the sibling
        // that follows it; the last child at a depth has none.
        let bound = node
            .children
            .get(index + 1)
            .and_then(|next| next.span.as_ref())
            .and_then(|span| span.end.as_ref());
        scan_node(child, bound, kinds, parser, options, out)?;
    }

    Ok(())
}

fn visit(
    node: &Node,
    bound: Option<&Point>,
    kinds: &[String],
    parser: &dyn MarkerParser,
    options: &Options,
    out: &mut Scan,
) -> Result<(), ControlError> {
    if !kinds.iter().any(|kind| kind == &node.kind) {
        return Ok(());
    }

    let Some(marker) = parser.parse(node) else {
        return Ok(());
    };
    if marker.name != options.name {
        return Ok(());
    }

    let verb: Verb = marker
        .keyword
        .parse()
        .map_err(|()| ControlError::UnknownKeyword {
            keyword: marker.keyword.clone(),
            span: marker.span.clone(),
        })?;

    let mut rule_ids = marker.rule_ids;
    if let Some(known) = &options.known {
        let explicit = !rule_ids.is_empty();
        rule_ids.retain(|rule| {
            if known.iter().any(|candidate| candidate == rule) {
                return true;
            }
            let mut warning = Message::new(&format!("Cannot {verb} `'{rule}'`, it's not known"));
            if let Some(span) = &marker.span {
                warning = warning.with_place(span.clone());
            }
            out.warnings.push(warning);
            false
        });
        // A named directive whose every rule was rejected is inert; it
        // must not widen into a wildcard directive.
        if explicit && rule_ids.is_empty() {
            return Ok(());
        }
    }

    debug!(
        "marker `{} {}` at {:?} affecting {:?}",
        options.name, verb, marker.span, rule_ids
    );

    out.directives.push(Directive {
        verb,
        rule_ids,
        point: marker.span.map(|span| span.start),
        bound: bound.cloned(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{CommentParser, DEFAULT_KINDS};
    use crate::position::Span;

    fn kinds() -> Vec<String> {
        DEFAULT_KINDS.iter().map(|kind| kind.to_string()).collect()
    }

    fn comment(value: &str, line: usize) -> Node {
        Node::new("html")
            .with_value(value)
            .with_span(Span::between(line, 1, line, value.len() + 1))
    }

    fn paragraph(line: usize) -> Node {
        Node::new("paragraph").with_span(Span::between(line, 1, line, 21))
    }

    #[test]
    fn test_collects_directives_in_document_order() {
        let tree = Node::new("root").with_children(vec![
            comment("<!--foo disable bar-->", 1),
            paragraph(3),
            comment("<!--foo enable bar-->", 5),
        ]);

        let scan = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo"),
        )
        .unwrap();

        assert_eq!(scan.directives.len(), 2);
        assert_eq!(scan.directives[0].verb, Verb::Disable);
        assert_eq!(scan.directives[0].point, Some(Point::new(1, 1)));
        assert_eq!(scan.directives[1].verb, Verb::Enable);
        assert_eq!(scan.directives[1].point, Some(Point::new(5, 1)));
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn test_skips_foreign_names_and_kinds() {
        let tree = Node::new("root").with_children(vec![
            comment("<!--bar disable baz-->", 1),
            Node::new("text").with_value("foo disable bar"),
        ]);

        let scan = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo"),
        )
        .unwrap();

        assert!(scan.directives.is_empty());
    }

    #[test]
    fn test_unknown_keyword_aborts() {
        let tree = Node::new("root").with_children(vec![
            comment("<!--foo test-->", 1),
            comment("<!--foo disable bar-->", 3),
        ]);

        let err = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo"),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "1:1-1:16: Unknown keyword `test`: expected `'enable'`, `'disable'`, or `'ignore'`"
        );
    }

    #[test]
    fn test_unknown_rule_warns_and_drops() {
        let tree = Node::new("root").with_children(vec![
            comment("<!--foo ignore known-->", 1),
            comment("<!--foo ignore unknown-->", 3),
        ]);

        let scan = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo").with_known(&["known"]),
        )
        .unwrap();

        // The first directive survives, the second is inert.
        assert_eq!(scan.directives.len(), 1);
        assert_eq!(scan.directives[0].rule_ids, ["known"]);
        assert_eq!(scan.warnings.len(), 1);
        assert_eq!(
            scan.warnings[0].to_string(),
            "3:1-3:26: Cannot ignore `'unknown'`, it's not known"
        );
    }

    #[test]
    fn test_ignore_bound_is_next_sibling_end() {
        let tree = Node::new("root").with_children(vec![
            comment("<!--foo ignore bar-->", 1),
            paragraph(3),
            paragraph(5),
        ]);

        let scan = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo"),
        )
        .unwrap();

        assert_eq!(scan.directives[0].bound, Some(Point::new(3, 21)));
    }

    #[test]
    fn test_trailing_marker_has_no_bound() {
        let tree = Node::new("root").with_children(vec![
            paragraph(1),
            comment("<!--foo ignore bar-->", 3),
        ]);

        let scan = scan(
            &tree,
            &kinds(),
            &CommentParser::new(),
            &Options::new("foo"),
        )
        .unwrap();

        assert_eq!(scan.directives[0].bound, None);
    }
}
