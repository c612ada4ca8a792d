use anyhow::{Context, Result};
use clap::Parser;
use home_price::{Artifacts, ArtifactPaths};
use home_price_mobile::{CompactModel, COLUMNS_FILE, COMPACT_MODEL_FILE};
use log::info;
use std::path::PathBuf;

/// Convert the JSON model export into the compact encoding.
#[derive(Parser)]
struct Args {
    /// Directory holding columns.json and the JSON model
    #[arg(long, default_value = "./artifacts")]
    artifacts_dir: PathBuf,

    /// JSON model file name inside the artifacts directory
    #[arg(long, default_value = "banglore_home_prices_model.json")]
    model_file: String,

    /// Output file; defaults to the compact model name inside the artifacts directory
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let paths = ArtifactPaths::in_dir(&args.artifacts_dir, COLUMNS_FILE, &args.model_file);
    // Loading through the estimator checks the model against its schema.
    let artifacts = Artifacts::load(&paths)?;
    let out = args
        .out
        .unwrap_or_else(|| args.artifacts_dir.join(COMPACT_MODEL_FILE));

    let compact = CompactModel::from_model(artifacts.model().clone());
    compact
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!("packed {} features", artifacts.schema().len());
    println!("Saved compact model to {:?}", out);
    Ok(())
}
