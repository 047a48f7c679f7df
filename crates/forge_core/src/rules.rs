//! Ordered keyword rules.
//!
//! A [`RuleTable`] is a tiny rule engine: rules are evaluated in insertion
//! order and the first one with any matching keyword decides the outcome.
//! Later rules never override an earlier match, however many of their own
//! keywords appear in the text.

/// A keyword group mapped to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule<T> {
    /// Lower-case substrings; any one of them matching fires the rule.
    pub keywords: Vec<&'static str>,
    pub tag: T,
}

impl<T> KeywordRule<T> {
    pub fn new(keywords: &[&'static str], tag: T) -> Self {
        Self {
            keywords: keywords.to_vec(),
            tag,
        }
    }

    /// Test the rule against already lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// An ordered list of keyword rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable<T> {
    rules: Vec<KeywordRule<T>>,
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: Copy> RuleTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; it is tested after every rule already present.
    pub fn rule(mut self, keywords: &[&'static str], tag: T) -> Self {
        self.rules.push(KeywordRule::new(keywords, tag));
        self
    }

    /// Case-insensitive substring match; first matching rule wins.
    pub fn first_match(&self, text: &str) -> Option<T> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.tag)
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
