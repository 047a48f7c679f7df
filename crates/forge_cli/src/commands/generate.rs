//! Generate command - Build a new application from a brief.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use forge_core::FallbackGenerator;
use forge_llm::{Attachment, CodeGenerator, LlmAdapter, LlmGenerator};

#[derive(Args)]
pub struct GenerateArgs {
    /// What the application should do
    #[arg(short, long)]
    brief: String,

    /// Output directory for index.html, style.css and script.js
    #[arg(short, long)]
    output: PathBuf,

    /// Acceptance check the application must satisfy (repeatable)
    #[arg(short, long = "check")]
    checks: Vec<String>,

    /// Attachment name to mention in the prompt (repeatable)
    #[arg(short, long = "attachment")]
    attachments: Vec<String>,

    /// Skip the LLM and use the built-in baselines
    #[arg(long, env = "FORGE_OFFLINE")]
    offline: bool,

    /// Override the provider's default model
    #[arg(long)]
    model: Option<String>,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let attachments: Vec<Attachment> = args
        .attachments
        .iter()
        .map(|name| Attachment::new(name.as_str(), ""))
        .collect();

    let (files, method) = match generator(&args) {
        Some(generator) => {
            match generator
                .generate(&args.brief, &attachments, &args.checks)
                .await
            {
                Ok(files) => (files, "llm"),
                Err(e) => {
                    warn!("LLM generation failed, using fallback: {}", e);
                    (FallbackGenerator::new().generate(&args.brief), "fallback")
                }
            }
        }
        None => (FallbackGenerator::new().generate(&args.brief), "fallback"),
    };

    files
        .write_dir(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(method, "Generated application in {}", args.output.display());

    println!("Generated {} ({})", args.output.display(), method);
    Ok(())
}

fn generator(args: &GenerateArgs) -> Option<LlmGenerator> {
    if args.offline {
        return None;
    }

    match LlmAdapter::from_env() {
        Ok(adapter) => {
            let adapter = match &args.model {
                Some(model) => adapter.with_model(model.clone()),
                None => adapter,
            };
            Some(LlmGenerator::new(adapter))
        }
        Err(e) => {
            info!("{}; using the built-in baselines", e);
            None
        }
    }
}
