//! Classify command - Show the update strategy for a brief.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use forge_core::{Classifier, StructuralInjector};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Revision brief to classify
    #[arg(short, long)]
    brief: String,

    /// Print JSON instead of plain text
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: ClassifyArgs) -> Result<()> {
    let strategy = Classifier::new().classify(&args.brief);
    let supported = StructuralInjector::new().supports(strategy);

    if args.json {
        let report = json!({ "strategy": strategy, "supported": supported });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if supported {
        println!("{}", strategy);
    } else {
        println!("{} (no fragment bundle, files would be left unchanged)", strategy);
    }

    Ok(())
}
