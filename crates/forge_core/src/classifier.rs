//! Revision brief classification.

use tracing::debug;

use forge_templates::UpdateStrategy;

use crate::rules::RuleTable;

/// Maps a free-text revision brief to exactly one [`UpdateStrategy`].
///
/// Groups are tested in a fixed order and the first group with any matching
/// keyword wins, so "add a dark theme search bar" is a dark-mode request.
/// Briefs matching no group fall through to generic enhancement.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RuleTable<UpdateStrategy>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        let table = RuleTable::new()
            .rule(&["dark mode", "dark", "theme"], UpdateStrategy::DarkMode)
            .rule(&["search", "filter"], UpdateStrategy::Search)
            .rule(&["favorite", "bookmark", "save"], UpdateStrategy::Favorites)
            .rule(&["chart", "graph", "visualization"], UpdateStrategy::Charts);
        Self { table }
    }

    /// Classify a brief. Total: always returns a strategy.
    pub fn classify(&self, brief: &str) -> UpdateStrategy {
        let strategy = self
            .table
            .first_match(brief)
            .unwrap_or(UpdateStrategy::GenericEnhancement);
        debug!(strategy = %strategy, "Classified revision brief");
        strategy
    }

    /// The underlying rule table, in precedence order.
    pub fn rules(&self) -> &RuleTable<UpdateStrategy> {
        &self.table
    }
}

/// Classify a brief with the default keyword table.
pub fn classify(brief: &str) -> UpdateStrategy {
    Classifier::new().classify(brief)
}
