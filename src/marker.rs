//! Marker directives decoded from comment-like nodes

use crate::position::Span;
use crate::tree::Node;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node kinds offered to the marker parser when none are configured.
///
/// Covers literal comment nodes, raw HTML comments, and the two
/// expression-comment kinds used by MDX-style dialects.
pub const DEFAULT_KINDS: [&str; 4] = [
    "comment",
    "html",
    "mdxFlowExpression",
    "mdxTextExpression",
];

/// Control verbs recognized in markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Enable,
    Disable,
    Ignore,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Enable => write!(f, "enable"),
            Verb::Disable => write!(f, "disable"),
            Verb::Ignore => write!(f, "ignore"),
        }
    }
}

impl std::str::FromStr for Verb {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(Verb::Enable),
            "disable" => Ok(Verb::Disable),
            "ignore" => Ok(Verb::Ignore),
            _ => Err(()),
        }
    }
}

/// A decoded directive, before keyword validation.
///
/// The keyword is kept as written so an unrecognized one can be quoted
/// verbatim in the resulting error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Marker name (the control instance this directive addresses)
    pub name: String,
    /// Raw keyword token following the name; empty when missing
    pub keyword: String,
    /// Explicit rule names; empty applies the directive to the wildcard state
    pub rule_ids: Vec<String>,
    /// Region of the originating node
    pub span: Option<Span>,
}

/// Decoder for candidate comment nodes.
///
/// Implementations return `None` for nodes that are not markers; that is
/// a silent skip, never an error.
pub trait MarkerParser {
    fn parse(&self, node: &Node) -> Option<Marker>;
}

/// Default decoder for comment markers.
///
/// Handles `<!--name keyword rules-->` HTML comments, bare comment-node
/// values (`name keyword rules`), and `/* name keyword rules */`
/// expression comments.
pub struct CommentParser {
    html: Regex,
    expression: Regex,
    directive: Regex,
}

impl CommentParser {
    pub fn new() -> Self {
        // Static patterns, known-good.
        Self {
            html: Regex::new(r"^\s*<!--([\s\S]*?)-->\s*$").unwrap(),
            expression: Regex::new(r"^\s*/\*([\s\S]*?)\*/\s*$").unwrap(),
            directive: Regex::new(r"^\s*([A-Za-z\d-]+)(?:\s+([\s\S]*?))?\s*$").unwrap(),
        }
    }
}

impl Default for CommentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerParser for CommentParser {
    fn parse(&self, node: &Node) -> Option<Marker> {
        let value = node.value.as_deref()?;

        let inner = match node.kind.as_str() {
            "html" => self.html.captures(value)?.get(1)?.as_str(),
            "mdxFlowExpression" | "mdxTextExpression" => {
                self.expression.captures(value)?.get(1)?.as_str()
            }
            _ => value,
        };

        let captures = self.directive.captures(inner)?;
        let name = captures[1].to_string();
        let mut tokens = captures
            .get(2)
            .map(|rest| rest.as_str().split_whitespace())
            .into_iter()
            .flatten()
            .map(String::from);

        Some(Marker {
            name,
            keyword: tokens.next().unwrap_or_default(),
            rule_ids: tokens.collect(),
            span: node.span.clone(),
        })
    }
}
