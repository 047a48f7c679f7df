//! Turning raw model output into a usable file set.

use serde_json::Value;
use tracing::debug;

use forge_templates::{Baseline, SourceFileSet};

use crate::error::{GenerateError, GenerateResult};

const DOCTYPE: &str = "<!DOCTYPE html>";

const RESPONSIVE_CSS: &str = "\n\n/* Responsive design */\n@media (max-width: 768px) {\n    .container { padding: 10px; }\n}";

const SCRIPT_HEADER: &str = "// Application JavaScript\n";

/// Remove a surrounding markdown code fence and any chatter around the
/// JSON object.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => "",
        };
        text = text.trim_end();
        if let Some(stripped) = text.strip_suffix("```") {
            text = stripped;
        }
        text = text.trim();
    }

    if !text.starts_with('{') {
        if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
            if start < end {
                text = &text[start..=end];
            }
        }
    }
    text
}

/// Parse a model response into a file set. Missing files read as empty.
pub fn parse_files(raw: &str) -> GenerateResult<SourceFileSet> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(GenerateError::InvalidOutput(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

/// Normalize generated files so each one is usable on its own.
pub fn clean_files(files: SourceFileSet, brief: &str) -> SourceFileSet {
    let baseline = Baseline::new();

    let markup = if files.markup.trim().is_empty() {
        debug!("Generated markup empty, using baseline markup");
        baseline.generic_markup(brief)
    } else if !files.markup.contains(DOCTYPE) {
        debug!("Generated markup lacks a doctype, wrapping in document shell");
        baseline.document_shell(&files.markup, brief)
    } else {
        files.markup
    };

    let stylesheet = if files.stylesheet.trim().is_empty() {
        baseline.basic_stylesheet().to_string()
    } else if !files.stylesheet.contains("@media")
        && !files.stylesheet.to_lowercase().contains("responsive")
    {
        files.stylesheet + RESPONSIVE_CSS
    } else {
        files.stylesheet
    };

    let script = if files.script.trim().is_empty() {
        baseline.basic_script().to_string()
    } else if !files.script.contains("try") && !files.script.contains("catch") {
        format!("{}{}", SCRIPT_HEADER, files.script)
    } else {
        files.script
    };

    SourceFileSet {
        markup,
        stylesheet,
        script,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(
            strip_code_fences("Here you go:\n{\"a\": 1}\nEnjoy!"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_parse_files_defaults_missing() {
        let files = parse_files(r#"{"index.html": "<p>x</p>", "extra.txt": "ignored"}"#).unwrap();
        assert_eq!(files.markup, "<p>x</p>");
        assert!(files.stylesheet.is_empty());
        assert!(files.script.is_empty());
    }

    #[test]
    fn test_parse_files_rejects_non_object() {
        assert!(matches!(
            parse_files("[1, 2]"),
            Err(GenerateError::InvalidOutput(_))
        ));
        assert!(matches!(parse_files("not json"), Err(GenerateError::Json(_))));
    }

    #[test]
    fn test_empty_files_replaced() {
        let cleaned = clean_files(SourceFileSet::default(), "A recipe box");
        assert!(cleaned.markup.contains("A recipe box"));
        assert!(cleaned.markup.starts_with(DOCTYPE));
        assert_eq!(cleaned.stylesheet, Baseline::new().basic_stylesheet());
        assert_eq!(cleaned.script, Baseline::new().basic_script());
    }

    #[test]
    fn test_fragment_markup_wrapped() {
        let files = SourceFileSet::new("<div id=\"app\"></div>", "", "");
        let cleaned = clean_files(files, "Todo");
        assert!(cleaned.markup.starts_with(DOCTYPE));
        assert!(cleaned.markup.contains("<div id=\"app\"></div>"));
        assert!(cleaned.markup.contains("Generated App: Todo"));
    }

    #[test]
    fn test_complete_markup_kept() {
        let markup = "<!DOCTYPE html><html><body></body></html>";
        let cleaned = clean_files(SourceFileSet::new(markup, "", ""), "x");
        assert_eq!(cleaned.markup, markup);
    }

    #[test]
    fn test_stylesheet_gets_responsive_block() {
        let cleaned = clean_files(SourceFileSet::new("", "p { color: red; }", ""), "x");
        assert_eq!(cleaned.stylesheet, format!("p {{ color: red; }}{}", RESPONSIVE_CSS));

        let css = "/* Responsive layout */\np {}";
        let cleaned = clean_files(SourceFileSet::new("", css, ""), "x");
        assert_eq!(cleaned.stylesheet, css);

        let css = "@media print { p {} }";
        let cleaned = clean_files(SourceFileSet::new("", css, ""), "x");
        assert_eq!(cleaned.stylesheet, css);
    }

    #[test]
    fn test_script_header() {
        let cleaned = clean_files(SourceFileSet::new("", "", "go();"), "x");
        assert_eq!(cleaned.script, "// Application JavaScript\ngo();");

        let js = "try { go(); } catch (e) {}";
        let cleaned = clean_files(SourceFileSet::new("", "", js), "x");
        assert_eq!(cleaned.script, js);
    }
}
