//! Prompt construction for application generation.

use crate::generator::Attachment;

/// System prompt: asks for a JSON object keyed by the three file names.
pub const SYSTEM_PROMPT: &str = r#"You are an expert web developer specializing in creating minimal, deployable static web applications for GitHub Pages.

IMPORTANT: Return ONLY valid JSON with this exact structure:
{
    "index.html": "complete HTML content referencing style.css and script.js",
    "script.js": "JavaScript code, or an empty string",
    "style.css": "CSS code, or an empty string"
}

Requirements:
- NO backend dependencies, static files only
- Mobile responsive
- Include Bootstrap 5 via CDN for styling
- Handle any file attachments mentioned in the brief
- Ensure all specified checks will pass
- Use modern HTML5, CSS3 and ES6+
- Include proper error handling
- Make it actually functional for the described purpose"#;

/// A rendered prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt for a brief, its checks and attachments.
    pub fn build(brief: &str, checks: &[String], attachments: &[Attachment]) -> Self {
        let checks = checks
            .iter()
            .map(|check| format!("• {}", check))
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "\nCREATE THIS APPLICATION:\n{brief}\n\n\
             REQUIRED CHECKS (MUST PASS):\n{checks}\n\n\
             ATTACHMENTS TO HANDLE:\n{attachments}\n\n\
             SPECIFIC INSTRUCTIONS:\n\
             1. Create a COMPLETE, WORKING application\n\
             2. If the brief mentions specific functionality (calculator, counter, data processing), implement it\n\
             3. Use Bootstrap 5 for styling via CDN\n\
             4. Ensure it works on GitHub Pages (static only)\n\
             5. Handle any file processing mentioned in attachments\n\
             6. Make sure all the required checks will pass\n\n\
             Return ONLY the JSON object with the code files.\n",
            brief = brief,
            checks = checks,
            attachments = attachment_summary(attachments),
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

/// Describe attachments for the model, one line each.
pub fn attachment_summary(attachments: &[Attachment]) -> String {
    if attachments.is_empty() {
        return "No attachments provided".to_string();
    }

    let mut summary = String::from("Available attachments:\n");
    for attachment in attachments {
        summary.push_str(&format!(
            "- {} ({} file)\n",
            attachment.name,
            attachment.file_type()
        ));
        let lowered = attachment.name.to_lowercase();
        if lowered.contains("sample") || lowered.contains("data") {
            summary.push_str(
                "  This appears to be sample data that should be used in the application.\n",
            );
        }
    }
    summary
}
