//! Placeholder rendering for fragments and baseline templates.

use std::collections::HashMap;

use regex::Regex;

/// Renders `{{name}}` placeholders.
///
/// Substitution is a single pass: values are inserted verbatim and are never
/// re-scanned, so a brief containing `{{brief}}` stays as typed.
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            variable_pattern: Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}")
                .expect("placeholder pattern is valid"),
        }
    }

    /// Render content by replacing variables. Unknown placeholders are left intact.
    pub fn render_content(&self, content: &str, variables: &HashMap<String, String>) -> String {
        self.variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                variables
                    .get(var_name)
                    .cloned()
                    .unwrap_or_else(|| format!("{{{{{}}}}}", var_name))
            })
            .into_owned()
    }

    /// Render with a short list of `(name, value)` pairs.
    pub fn render_with(&self, content: &str, pairs: &[(&str, &str)]) -> String {
        let variables = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.render_content(content, &variables)
    }

    /// List the placeholder names a template refers to, in order of appearance.
    pub fn placeholders(&self, content: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in self.variable_pattern.captures_iter(content) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
