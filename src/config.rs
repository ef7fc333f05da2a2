//! Options for a message control instance

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Expected `name` in `options`, got `{got}`")]
    MissingName { got: String },
}

/// Options for one control instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Marker name this instance reacts to
    pub name: String,

    /// Message namespaces governed by this instance (defaults to `name`)
    #[serde(default)]
    pub source: Vec<String>,

    /// Valid rule names; unset disables validation
    #[serde(default)]
    pub known: Option<Vec<String>>,

    /// Start with every rule disabled instead of enabled
    #[serde(default)]
    pub reset: bool,

    /// Rules enabled before the document is scanned
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rules disabled before the document is scanned
    #[serde(default)]
    pub disable: Vec<String>,
}

impl Options {
    /// Create options reacting to markers named `name`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: Vec::new(),
            known: None,
            reset: false,
            enable: Vec::new(),
            disable: Vec::new(),
        }
    }

    /// Add a governed namespace
    pub fn with_source(mut self, source: &str) -> Self {
        self.source.push(source.to_string());
        self
    }

    /// Restrict rule names to a known set
    pub fn with_known(mut self, known: &[&str]) -> Self {
        self.known = Some(known.iter().map(|rule| rule.to_string()).collect());
        self
    }

    /// Start with every rule disabled
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Enable rules before the document is scanned
    pub fn with_enable(mut self, rules: &[&str]) -> Self {
        self.enable = rules.iter().map(|rule| rule.to_string()).collect();
        self
    }

    /// Disable rules before the document is scanned
    pub fn with_disable(mut self, rules: &[&str]) -> Self {
        self.disable = rules.iter().map(|rule| rule.to_string()).collect();
        self
    }

    /// The namespaces governed by this instance.
    pub fn sources(&self) -> Vec<&str> {
        if self.source.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.source.iter().map(String::as_str).collect()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingName {
                got: self.name.clone(),
            });
        }
        Ok(())
    }
}
