//! CLI command definitions.
//!
//! Each subcommand maps to one pageforge workflow.

use clap::{Parser, Subcommand};

pub mod classify;
pub mod generate;
pub mod revise;
pub mod serve;

/// pageforge - generate, revise and publish static web apps
#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "pageforge - generate, revise and publish static web apps")]
#[command(long_about = r#"
pageforge builds single-page static web apps from natural-language briefs
and revises them with follow-up briefs.

WORKFLOWS:
  serve     → Run the build API (POST /api/build)
  generate  → Generate index.html, style.css and script.js from a brief
  revise    → Apply a revision brief to an existing directory
  classify  → Show which update strategy a brief selects

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Publish error
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "FORGE_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP build server
    Serve(serve::ServeArgs),

    /// Generate a new application from a brief
    Generate(generate::GenerateArgs),

    /// Revise an existing application
    Revise(revise::ReviseArgs),

    /// Classify a revision brief
    Classify(classify::ClassifyArgs),
}
