//! Update strategies and revision requests.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::fileset::SourceFileSet;

/// Discrete category of revision intent inferred from a brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStrategy {
    DarkMode,
    Search,
    Favorites,
    Charts,
    GenericEnhancement,
}

impl UpdateStrategy {
    pub const ALL: [UpdateStrategy; 5] = [
        UpdateStrategy::DarkMode,
        UpdateStrategy::Search,
        UpdateStrategy::Favorites,
        UpdateStrategy::Charts,
        UpdateStrategy::GenericEnhancement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DarkMode => "dark-mode",
            Self::Search => "search",
            Self::Favorites => "favorites",
            Self::Charts => "charts",
            Self::GenericEnhancement => "generic-enhancement",
        }
    }
}

impl std::fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStrategy {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| TemplateError::UnknownStrategy(s.to_string()))
    }
}

/// A single-shot revision: a brief plus the files it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequest {
    pub brief: String,
    pub existing: SourceFileSet,
}

impl RevisionRequest {
    pub fn new(brief: impl Into<String>, existing: SourceFileSet) -> Self {
        Self {
            brief: brief.into(),
            existing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in UpdateStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<UpdateStrategy>().unwrap(), strategy);
        }
        assert_eq!(
            "Generic_Enhancement".parse::<UpdateStrategy>().unwrap(),
            UpdateStrategy::GenericEnhancement
        );
        assert!("sparkles".parse::<UpdateStrategy>().is_err());
    }

    #[test]
    fn test_strategy_serde_is_kebab_case() {
        let json = serde_json::to_string(&UpdateStrategy::DarkMode).unwrap();
        assert_eq!(json, "\"dark-mode\"");
    }
}
