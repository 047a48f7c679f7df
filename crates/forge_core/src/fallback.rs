//! Deterministic application generation from a brief.

use tracing::info;

use forge_templates::{Baseline, BaselineKind, SourceFileSet};

use crate::rules::RuleTable;

/// Picks and renders a baseline application for a brief.
///
/// Used for round 1 when no external generator is configured or it fails.
pub struct FallbackGenerator {
    table: RuleTable<BaselineKind>,
    baseline: Baseline,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackGenerator {
    pub fn new() -> Self {
        Self {
            table: RuleTable::new()
                .rule(&["calculator"], BaselineKind::Calculator)
                .rule(&["counter"], BaselineKind::Counter),
            baseline: Baseline::new(),
        }
    }

    /// Which baseline a brief selects.
    pub fn select(&self, brief: &str) -> BaselineKind {
        self.table
            .first_match(brief)
            .unwrap_or(BaselineKind::Generic)
    }

    /// Produce a complete file set for `brief`.
    pub fn generate(&self, brief: &str) -> SourceFileSet {
        let kind = self.select(brief);
        info!(baseline = %kind, "Generating baseline application");
        self.baseline.render(kind, brief)
    }
}

/// Generate a baseline application with the default rules.
pub fn generate_from_brief(brief: &str) -> SourceFileSet {
    FallbackGenerator::new().generate(brief)
}
