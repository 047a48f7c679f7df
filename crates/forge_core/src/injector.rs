//! Structural injection of fragment bundles into existing file sets.
//!
//! The injector never parses the existing content. It only looks for the
//! literal body anchors in the markup and appends to the stylesheet and
//! script. A missing anchor drops the markup fragment; it is never appended
//! anywhere else.

use tracing::debug;

use forge_templates::{Anchor, FragmentBundle, FragmentLibrary, SourceFileSet, UpdateStrategy};

/// Applies update strategies to file sets.
#[derive(Default)]
pub struct StructuralInjector {
    library: FragmentLibrary,
}

impl StructuralInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `strategy` has a bundle to inject.
    pub fn supports(&self, strategy: UpdateStrategy) -> bool {
        self.library.supports(strategy)
    }

    /// Apply a strategy to an existing file set.
    ///
    /// Strategies without a bundle return an unchanged copy of `existing`.
    pub fn apply(
        &self,
        strategy: UpdateStrategy,
        existing: &SourceFileSet,
        brief: &str,
    ) -> SourceFileSet {
        match self.library.bundle(strategy, brief) {
            Some(bundle) => inject(&bundle, existing),
            None => {
                debug!(strategy = %strategy, "No bundle to inject, returning files unchanged");
                existing.clone()
            }
        }
    }
}

/// Splice a bundle into a file set, returning a new set.
pub fn inject(bundle: &FragmentBundle, existing: &SourceFileSet) -> SourceFileSet {
    let markup = insert_markup(&existing.markup, bundle.anchor, &bundle.markup);
    if markup.len() == existing.markup.len() {
        debug!(strategy = %bundle.strategy, "Markup anchor not found, fragment dropped");
    }

    let mut stylesheet = String::with_capacity(existing.stylesheet.len() + bundle.stylesheet.len());
    stylesheet.push_str(&existing.stylesheet);
    stylesheet.push_str(&bundle.stylesheet);

    let mut script = existing.script.clone();
    if let Some(fragment) = &bundle.script {
        script.push_str(fragment);
    }

    SourceFileSet {
        markup,
        stylesheet,
        script,
    }
}

/// Apply a strategy with the default fragment library.
pub fn apply(strategy: UpdateStrategy, existing: &SourceFileSet, brief: &str) -> SourceFileSet {
    StructuralInjector::new().apply(strategy, existing, brief)
}

/// Insert `fragment` at the first occurrence of the anchor.
///
/// Every insertion requires the opening `<body>` tag to be present; trailing
/// panels additionally need `</body>`.
fn insert_markup(markup: &str, anchor: Anchor, fragment: &str) -> String {
    let open_tag = Anchor::BodyOpen.tag();
    let Some(open) = markup.find(open_tag) else {
        return markup.to_string();
    };

    match anchor {
        Anchor::BodyOpen => {
            let at = open + open_tag.len();
            format!("{}\n{}\n{}", &markup[..at], fragment, &markup[at..])
        }
        Anchor::BodyClose => match markup.find(anchor.tag()) {
            Some(at) => format!("{}\n{}\n{}", &markup[..at], fragment, &markup[at..]),
            None => markup.to_string(),
        },
    }
}
