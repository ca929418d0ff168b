//! Diff granularity modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use draftroom_core::AppError;

/// Token granularity for the diff engine.
///
/// Closed set: an unrecognized mode string is rejected at parse time rather
/// than silently falling through to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Individual characters.
    Character,
    /// Whitespace-split words.
    Word,
    /// Lines, keeping their terminators.
    Line,
    /// Lines, with a character-similarity rescue for replaced blocks.
    Semantic,
}

impl DiffMode {
    /// Return the mode as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Line => "line",
            Self::Semantic => "semantic",
        }
    }
}

impl Default for DiffMode {
    fn default() -> Self {
        Self::Semantic
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "character" => Ok(Self::Character),
            "word" => Ok(Self::Word),
            "line" => Ok(Self::Line),
            "semantic" => Ok(Self::Semantic),
            _ => Err(AppError::validation(format!(
                "Invalid diff mode: '{s}'. Expected one of: character, word, line, semantic"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("line".parse::<DiffMode>().unwrap(), DiffMode::Line);
        assert_eq!("SEMANTIC".parse::<DiffMode>().unwrap(), DiffMode::Semantic);
        assert!("paragraph".parse::<DiffMode>().is_err());
    }
}
