//! Revision engine: classify, then inject or generate.

use serde::Serialize;
use tracing::{info, warn};

use forge_templates::{RevisionRequest, SourceFileSet, UpdateStrategy};

use crate::classifier::Classifier;
use crate::fallback::FallbackGenerator;
use crate::injector::StructuralInjector;

/// What the engine did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevisionStatus {
    /// A bundle was injected. `markup_inserted` is false when the markup had
    /// no usable anchor and only the stylesheet and script changed.
    Applied { markup_inserted: bool },
    /// The strategy has no bundle; the files are returned unchanged.
    Unsupported,
    /// There was nothing to revise, so a baseline app was generated.
    Generated,
}

/// Result of a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionOutcome {
    /// Selected strategy; `None` when the files were generated.
    pub strategy: Option<UpdateStrategy>,
    pub files: SourceFileSet,
    pub status: RevisionStatus,
}

impl RevisionOutcome {
    /// Whether the returned files differ from the input in any way.
    pub fn changed(&self) -> bool {
        !matches!(self.status, RevisionStatus::Unsupported)
    }
}

#[derive(Default)]
pub struct RevisionEngine {
    classifier: Classifier,
    injector: StructuralInjector,
    fallback: FallbackGenerator,
}

impl RevisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revise an existing file set according to the request brief.
    pub fn revise(&self, request: &RevisionRequest) -> RevisionOutcome {
        let strategy = self.classifier.classify(&request.brief);
        self.revise_with(strategy, request)
    }

    /// Apply a known strategy, skipping classification.
    pub fn revise_with(&self, strategy: UpdateStrategy, request: &RevisionRequest) -> RevisionOutcome {
        if !self.injector.supports(strategy) {
            warn!(strategy = %strategy, "Strategy has no fragment bundle, files left unchanged");
            return RevisionOutcome {
                strategy: Some(strategy),
                files: request.existing.clone(),
                status: RevisionStatus::Unsupported,
            };
        }

        let files = self
            .injector
            .apply(strategy, &request.existing, &request.brief);
        let markup_inserted = files.markup != request.existing.markup;
        if !markup_inserted {
            warn!(strategy = %strategy, "No body anchor in markup, only stylesheet and script updated");
        }
        info!(strategy = %strategy, markup_inserted, "Applied revision");

        RevisionOutcome {
            strategy: Some(strategy),
            files,
            status: RevisionStatus::Applied { markup_inserted },
        }
    }

    /// Revise `existing` when there is something to revise, otherwise
    /// generate a baseline app from the brief.
    pub fn revise_or_generate(
        &self,
        brief: &str,
        existing: Option<&SourceFileSet>,
    ) -> RevisionOutcome {
        match existing {
            Some(files) if !files.is_empty() => {
                self.revise(&RevisionRequest::new(brief, files.clone()))
            }
            _ => {
                info!("Nothing to revise, generating baseline application");
                RevisionOutcome {
                    strategy: None,
                    files: self.fallback.generate(brief),
                    status: RevisionStatus::Generated,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> SourceFileSet {
        SourceFileSet::new(
            "<html><body><h1>X</h1></body></html>",
            "h1 { color: red; }",
            "console.log('x');",
        )
    }

    #[test]
    fn test_revise_applies_classified_strategy() {
        let outcome = RevisionEngine::new().revise(&RevisionRequest::new("Add search", page()));
        assert_eq!(outcome.strategy, Some(UpdateStrategy::Search));
        assert_eq!(
            outcome.status,
            RevisionStatus::Applied {
                markup_inserted: true
            }
        );
        assert!(outcome.files.markup.contains("searchInput"));
        assert!(outcome.changed());
    }

    #[test]
    fn test_charts_are_unsupported() {
        let outcome =
            RevisionEngine::new().revise(&RevisionRequest::new("add a sales chart", page()));
        assert_eq!(outcome.strategy, Some(UpdateStrategy::Charts));
        assert_eq!(outcome.status, RevisionStatus::Unsupported);
        assert_eq!(outcome.files, page());
        assert!(!outcome.changed());
    }

    #[test]
    fn test_revise_with_ignores_brief_keywords() {
        let request = RevisionRequest::new("add a sales chart", page());
        let outcome = RevisionEngine::new().revise_with(UpdateStrategy::Search, &request);
        assert_eq!(outcome.strategy, Some(UpdateStrategy::Search));
        assert!(outcome.files.markup.contains("searchInput"));
    }

    #[test]
    fn test_missing_anchor_reported() {
        let existing = SourceFileSet::new("<div>no body</div>", "", "");
        let outcome =
            RevisionEngine::new().revise(&RevisionRequest::new("dark mode", existing.clone()));
        assert_eq!(
            outcome.status,
            RevisionStatus::Applied {
                markup_inserted: false
            }
        );
        assert_eq!(outcome.files.markup, existing.markup);
        assert!(outcome.files.stylesheet.contains(".dark-mode"));
    }

    #[test]
    fn test_revise_or_generate_without_files() {
        let engine = RevisionEngine::new();
        let outcome = engine.revise_or_generate("a counter", None);
        assert_eq!(outcome.status, RevisionStatus::Generated);
        assert_eq!(outcome.strategy, None);
        assert!(outcome.files.markup.contains(r#"id="increment""#));

        let blank = SourceFileSet::new("  ", "\n", "");
        let outcome = engine.revise_or_generate("a counter", Some(&blank));
        assert_eq!(outcome.status, RevisionStatus::Generated);
    }

    #[test]
    fn test_revise_or_generate_with_files() {
        let outcome = RevisionEngine::new().revise_or_generate("bookmark things", Some(&page()));
        assert_eq!(outcome.strategy, Some(UpdateStrategy::Favorites));
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let value = serde_json::to_value(RevisionStatus::Applied {
            markup_inserted: true,
        })
        .unwrap();
        assert_eq!(value["status"], "applied");
        assert_eq!(value["markup_inserted"], true);
    }
}
