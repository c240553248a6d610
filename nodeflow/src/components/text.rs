//! Built-in text preprocessing components over [`Document`].

use super::Component;
use crate::core::{Container, Document};
use crate::errors::{ConfigurationError, Result};
use regex::Regex;

const PUNCTUATION_PATTERN: &str = r"[^\w\s]";

/// Lowercases the document text.
#[derive(Debug, Clone)]
pub struct Lowercase {
    name: String,
}

impl Lowercase {
    /// Creates the component.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "lowercase".to_string(),
        }
    }
}

impl Default for Lowercase {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Document> for Lowercase {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, mut data: Container<Document>) -> Result<Container<Document>> {
        data.payload.text = data.payload.text.to_lowercase();
        Ok(data)
    }
}

/// Removes characters matching a pattern (punctuation by default).
#[derive(Debug, Clone)]
pub struct StripPunctuation {
    name: String,
    pattern: Regex,
}

impl StripPunctuation {
    /// Creates the component with the default punctuation pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(PUNCTUATION_PATTERN)
    }

    /// Creates the component with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            ConfigurationError::new("CONFIG-INVALID_PATTERN", format!("Invalid pattern: {e}"))
        })?;
        Ok(Self {
            name: "strip_punctuation".to_string(),
            pattern,
        })
    }
}

impl Component<Document> for StripPunctuation {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, mut data: Container<Document>) -> Result<Container<Document>> {
        data.payload.text = self.pattern.replace_all(&data.payload.text, "").into_owned();
        Ok(data)
    }
}

/// Splits the document text on whitespace into tokens.
#[derive(Debug, Clone)]
pub struct WhitespaceTokenizer {
    name: String,
}

impl WhitespaceTokenizer {
    /// Creates the component.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "tokenize".to_string(),
        }
    }
}

impl Default for WhitespaceTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Document> for WhitespaceTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, mut data: Container<Document>) -> Result<Container<Document>> {
        data.payload.tokens = data
            .payload
            .text
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Ok(data)
    }
}
