//! Quell - marker-driven message control
//!
//! Enables, disables, and ignores lint messages in a document through
//! marker comments found in its syntax tree. The host parses the
//! document and collects messages; quell decodes
//! `enable`/`disable`/`ignore` directives from comment-like nodes and
//! filters the message list by position, rule, and namespace.
//!
//! # Architecture
//!
//! ```text
//! tree + options -> scan (markers) -> state timeline -> filter -> messages
//! ```
//!
//! # Example
//!
//! ```
//! use quell::{Controller, Message, Node, Options, Point, Span};
//!
//! let tree = Node::new("root")
//!     .with_children(vec![
//!         Node::new("html")
//!             .with_value("<!--lint disable style-->")
//!             .with_span(Span::between(1, 1, 1, 26)),
//!         Node::new("paragraph").with_span(Span::between(3, 1, 3, 21)),
//!     ])
//!     .with_span(Span::between(1, 1, 3, 21));
//!
//! let messages = vec![
//!     Message::new("Heading style is inconsistent")
//!         .with_origin("lint:style")
//!         .with_point(Point::new(3, 1)),
//! ];
//!
//! let controller = Controller::new(Options::new("lint"))?;
//! let kept = controller.run(&tree, messages)?;
//! assert!(kept.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod control;
pub mod marker;
pub mod message;
pub mod position;
pub mod tree;

mod coverage;
mod scan;

// Re-export main types
pub use config::{ConfigError, Options};
pub use control::{ControlError, Controller};
pub use marker::{CommentParser, Marker, MarkerParser, Verb, DEFAULT_KINDS};
pub use message::{Message, Severity};
pub use position::{Point, Span};
pub use tree::{Node, Walk};
