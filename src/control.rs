//! State timeline and message filtering

use crate::config::{ConfigError, Options};
use crate::coverage::{detect_gaps, in_gap};
use crate::marker::{CommentParser, MarkerParser, Verb, DEFAULT_KINDS};
use crate::message::{Message, Severity};
use crate::position::{Point, Span};
use crate::scan::{scan, Directive};
use crate::tree::Node;
use log::{debug, trace};
use std::collections::HashMap;
use thiserror::Error;

/// Control failure visible to the caller
#[derive(Debug, Error)]
pub enum ControlError {
    /// A marker used a keyword other than the three recognized verbs
    #[error("{}", prefixed(.span, &unknown_keyword(.keyword)))]
    UnknownKeyword {
        keyword: String,
        span: Option<Span>,
    },
}

fn unknown_keyword(keyword: &str) -> String {
    format!("Unknown keyword `{keyword}`: expected `'enable'`, `'disable'`, or `'ignore'`")
}

fn prefixed(span: &Option<Span>, reason: &str) -> String {
    match span {
        Some(span) => format!("{span}: {reason}"),
        None => reason.to_string(),
    }
}

impl ControlError {
    /// The failure as a message, for hosts that surface it as the sole
    /// entry of their output list.
    pub fn into_message(self) -> Message {
        let ControlError::UnknownKeyword { keyword, span } = self;
        let mut message =
            Message::new(&unknown_keyword(&keyword)).with_severity(Severity::Error);
        if let Some(span) = span {
            message = message.with_place(span);
        }
        message
    }
}

/// One enable/disable switch on the timeline
#[derive(Debug, Clone)]
struct Mark {
    /// Where the switch takes effect; a mark without a point never
    /// matches a lookup (an ignore window left open to end of document)
    point: Option<Point>,
    enable: bool,
}

/// Position-ordered rule state, built from the directive sequence
#[derive(Debug, Default)]
struct Timeline {
    /// Switches for messages without an explicit rule id
    wildcard: Vec<Mark>,
    /// Per-rule switches, each list seeded from the wildcard history
    /// current at its creation
    rules: HashMap<String, Vec<Mark>>,
}

impl Timeline {
    fn apply(&mut self, directive: &Directive) {
        match directive.verb {
            Verb::Enable | Verb::Disable => {
                let enable = directive.verb == Verb::Enable;
                if directive.rule_ids.is_empty() {
                    self.toggle(directive.point.clone(), enable, None);
                } else {
                    for rule in &directive.rule_ids {
                        self.toggle(directive.point.clone(), enable, Some(rule));
                    }
                }
            }
            Verb::Ignore => {
                // A one-shot window: off at the marker, back on at the
                // structural boundary that follows it.
                if directive.rule_ids.is_empty() {
                    self.toggle(directive.point.clone(), false, None);
                    self.toggle(directive.bound.clone(), true, None);
                } else {
                    for rule in &directive.rule_ids {
                        self.toggle(directive.point.clone(), false, Some(rule));
                        self.toggle(directive.bound.clone(), true, Some(rule));
                    }
                }
            }
        }
    }

    fn toggle(&mut self, point: Option<Point>, enable: bool, rule: Option<&str>) {
        let mark = Mark { point, enable };
        match rule {
            Some(rule) => {
                let wildcard = &self.wildcard;
                self.rules
                    .entry(rule.to_string())
                    .or_insert_with(|| wildcard.clone())
                    .push(mark);
            }
            None => {
                // Wildcard switches also apply to every rule that has
                // its own history.
                for marks in self.rules.values_mut() {
                    marks.push(mark.clone());
                }
                self.wildcard.push(mark);
            }
        }
    }

    /// Latest switch at or before `point`, preferring the rule's own
    /// history over the wildcard one. Boundaries are inclusive: a
    /// message exactly at a switch point gets the switched state.
    fn lookup(&self, point: &Point, rule: Option<&str>) -> Option<bool> {
        let marks = match rule.and_then(|rule| self.rules.get(rule)) {
            Some(marks) => marks,
            None => &self.wildcard,
        };
        marks
            .iter()
            .rev()
            .find(|mark| {
                matches!(&mark.point, Some(switch) if switch.at_or_before(point))
            })
            .map(|mark| mark.enable)
    }
}

/// A configured message control instance.
///
/// Decodes `enable`/`disable`/`ignore` markers from a document tree and
/// filters a message list against the resulting rule state. Built fresh
/// per document; holds no state across runs.
pub struct Controller {
    options: Options,
    kinds: Vec<String>,
    parser: Box<dyn MarkerParser>,
}

impl Controller {
    /// Create a controller with the default comment parser and node kinds.
    pub fn new(options: Options) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            kinds: DEFAULT_KINDS.iter().map(|kind| kind.to_string()).collect(),
            parser: Box::new(CommentParser::new()),
        })
    }

    /// Replace the accepted comment-bearing node kinds.
    pub fn with_kinds(mut self, kinds: &[&str]) -> Self {
        self.kinds = kinds.iter().map(|kind| kind.to_string()).collect();
        self
    }

    /// Replace the marker decoder.
    pub fn with_parser(mut self, parser: Box<dyn MarkerParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Filter `messages` against the markers found in `tree`.
    ///
    /// Returns a fresh list: surviving messages plus any warnings the
    /// scan produced, ordered by document position. The single fatal
    /// condition is a marker with an unrecognized keyword; see
    /// [`ControlError::into_message`] for surfacing it in output.
    pub fn run(&self, tree: &Node, messages: Vec<Message>) -> Result<Vec<Message>, ControlError> {
        let scan = scan(tree, &self.kinds, self.parser.as_ref(), &self.options)?;
        debug!(
            "control `{}`: {} directive(s), {} warning(s), {} message(s)",
            self.options.name,
            scan.directives.len(),
            scan.warnings.len(),
            messages.len()
        );

        let mut timeline = Timeline::default();
        for directive in &scan.directives {
            timeline.apply(directive);
        }

        let gaps = detect_gaps(tree);
        let sources = self.options.sources();

        let mut output: Vec<Message> = Vec::with_capacity(messages.len() + scan.warnings.len());
        for message in messages {
            if self.keep(&timeline, &gaps, &sources, &message) {
                output.push(message);
            }
        }
        // Scan warnings are merged at their natural document position and
        // are themselves never subject to control.
        output.extend(scan.warnings);
        output.sort_by_key(|message| match &message.place {
            Some(place) => (1, place.start.line, place.start.column),
            None => (0, 0, 0),
        });

        Ok(output)
    }

    fn keep(
        &self,
        timeline: &Timeline,
        gaps: &[(Point, Point)],
        sources: &[&str],
        message: &Message,
    ) -> bool {
        let governed = message
            .source
            .as_deref()
            .is_some_and(|source| sources.contains(&source));
        if !governed {
            return true;
        }

        // A message with no position is always visible.
        let Some(place) = &message.place else {
            return true;
        };
        let point = &place.start;

        if in_gap(gaps, point) {
            trace!("dropping `{message}`: inside an uncovered region");
            return false;
        }

        let enabled = timeline
            .lookup(point, message.rule_id.as_deref())
            .unwrap_or_else(|| self.initial(message.rule_id.as_deref()));
        if !enabled {
            trace!("dropping `{message}`: rule state disabled at {point}");
        }
        enabled
    }

    /// State in force before any marker applies: the initial `enable`
    /// list wins over `disable`, which wins over the `reset` base.
    fn initial(&self, rule: Option<&str>) -> bool {
        if let Some(rule) = rule {
            if self.options.enable.iter().any(|candidate| candidate == rule) {
                return true;
            }
            if self.options.disable.iter().any(|candidate| candidate == rule) {
                return false;
            }
        }
        !self.options.reset
    }
}
