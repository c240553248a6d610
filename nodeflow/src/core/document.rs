//! Text document payload used by the built-in text components.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A piece of text and the tokens derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The (possibly preprocessed) text.
    pub text: String,
    /// Tokens, empty until a tokenizer runs.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Free-form annotations added by nodes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Creates a document from text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the number of characters in the text.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the document has been tokenized.
    #[must_use]
    pub fn is_tokenized(&self) -> bool {
        !self.tokens.is_empty()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
