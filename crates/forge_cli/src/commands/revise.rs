//! Revise command - Apply a revision brief to files on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_core::{
    RevisionEngine, RevisionOutcome, RevisionRequest, RevisionStatus, SourceFileSet,
    UpdateStrategy,
};

#[derive(Args)]
pub struct ReviseArgs {
    /// Directory holding index.html, style.css and script.js
    #[arg(short, long)]
    dir: PathBuf,

    /// Revision brief
    #[arg(short, long)]
    brief: String,

    /// Where to write the revised files (defaults to --dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Apply this strategy instead of classifying the brief
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<UpdateStrategy>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: ReviseArgs) -> Result<()> {
    let existing = SourceFileSet::load_dir(&args.dir)
        .with_context(|| format!("Failed to read {}", args.dir.display()))?;

    let engine = RevisionEngine::new();
    let outcome = match args.strategy {
        Some(strategy) => {
            let existing = existing
                .with_context(|| format!("No source files found in {}", args.dir.display()))?;
            engine.revise_with(strategy, &RevisionRequest::new(args.brief.as_str(), existing))
        }
        None => engine.revise_or_generate(&args.brief, existing.as_ref()),
    };

    let output = args.output.unwrap_or(args.dir);
    outcome
        .files
        .write_dir(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote revised files to {}", output.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome_summary(&outcome))?);
        return Ok(());
    }

    let strategy = outcome
        .strategy
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    match outcome.status {
        RevisionStatus::Applied { markup_inserted: true } => {
            println!("Applied {} to {}", strategy, output.display())
        }
        RevisionStatus::Applied { markup_inserted: false } => println!(
            "Applied {} to {} (no <body> tag, markup unchanged)",
            strategy,
            output.display()
        ),
        RevisionStatus::Unsupported => {
            println!("{} is not supported yet, files left unchanged", strategy)
        }
        RevisionStatus::Generated => {
            println!("Nothing to revise, generated a new app in {}", output.display())
        }
    }

    Ok(())
}

fn parse_strategy(value: &str) -> Result<UpdateStrategy, String> {
    value.parse::<UpdateStrategy>().map_err(|e| {
        let known: Vec<&str> = UpdateStrategy::ALL.iter().map(|s| s.as_str()).collect();
        format!("{} (expected one of: {})", e, known.join(", "))
    })
}

fn outcome_summary(outcome: &RevisionOutcome) -> serde_json::Value {
    serde_json::json!({
        "strategy": outcome.strategy,
        "status": outcome.status,
        "changed": outcome.changed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse_strategy("dark_mode"), Ok(UpdateStrategy::DarkMode));
        let err = parse_strategy("sparkles").unwrap_err();
        assert!(err.contains("sparkles"));
        assert!(err.contains("generic-enhancement"));
    }
}
