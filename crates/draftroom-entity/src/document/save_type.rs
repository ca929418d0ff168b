//! Save type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a version came to be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "save_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    /// Explicit save by the user.
    Manual,
    /// Periodic autosave.
    Auto,
    /// Draft saved without committing.
    Draft,
}

impl SaveType {
    /// Return the save type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SaveType {
    type Err = draftroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            "draft" => Ok(Self::Draft),
            _ => Err(draftroom_core::AppError::validation(format!(
                "Invalid save type: '{s}'. Expected one of: manual, auto, draft"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("manual".parse::<SaveType>().unwrap(), SaveType::Manual);
        assert_eq!("AUTO".parse::<SaveType>().unwrap(), SaveType::Auto);
        assert!("snapshot".parse::<SaveType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SaveType::Draft).unwrap(),
            "\"draft\""
        );
    }
}
