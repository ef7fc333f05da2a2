//! Message types for control results

use crate::position::{Point, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a message the engine emits: rule-name warnings stay
/// warnings, the fatal unknown-keyword condition is tagged an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Warning,
    Error,
}

/// A diagnostic message subject to marker control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable reason
    pub reason: String,
    /// Source location, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Span>,
    /// Rule that produced this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Namespace of the producing component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Severity level
    #[serde(default)]
    pub severity: Severity,
}

impl Message {
    /// Create a new message
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
            place: None,
            rule_id: None,
            source: None,
            severity: Severity::default(),
        }
    }

    /// Attach a source region
    pub fn with_place(mut self, place: Span) -> Self {
        self.place = Some(place);
        self
    }

    /// Attach a start-only source location
    pub fn with_point(mut self, point: Point) -> Self {
        self.place = Some(Span::at(point));
        self
    }

    /// Set the rule id
    pub fn with_rule_id(mut self, rule_id: &str) -> Self {
        self.rule_id = Some(rule_id.to_string());
        self
    }

    /// Set the namespace
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Set namespace and rule id from a combined `source:rule` origin.
    ///
    /// A bare token without `:` is just the rule id.
    pub fn with_origin(mut self, origin: &str) -> Self {
        match origin.split_once(':') {
            Some((source, rule_id)) => {
                self.source = Some(source.to_string());
                self.rule_id = Some(rule_id.to_string());
            }
            None => self.rule_id = Some(origin.to_string()),
        }
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.place {
            Some(place) => write!(f, "{}: {}", place, self.reason),
            // A message without a place renders at the document start.
            None => write!(f, "1:1: {}", self.reason),
        }
    }
}
