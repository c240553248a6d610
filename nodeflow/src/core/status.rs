//! Node position and pipeline state enums.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested structural placement of a node at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Insert at the front of the node list.
    First,
    /// Append to the end of the node list.
    Last,
    /// Same as `Last`.
    #[default]
    Default,
    /// Insert directly after the reference node.
    After,
    /// Insert directly before the reference node.
    Before,
}

impl Position {
    /// Returns true if this position needs a reference node.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        matches!(self, Self::After | Self::Before)
    }

    /// Returns the lowercase name of the position.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Default => "default",
            Self::After => "after",
            Self::Before => "before",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "default" => Ok(Self::Default),
            "after" => Ok(Self::After),
            "before" => Ok(Self::Before),
            other => Err(ConfigurationError::unknown_position(other)),
        }
    }
}

/// Lifecycle state of a pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// No nodes registered.
    Empty,
    /// Nodes registered, nothing compiled (or the cache was invalidated).
    Configured,
    /// A compiled pipeline is cached.
    Built,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Configured => write!(f, "configured"),
            Self::Built => write!(f, "built"),
        }
    }
}
