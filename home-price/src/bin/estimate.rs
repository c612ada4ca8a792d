//! Interactive home price estimator.
//!
//! Loads the artifacts once at startup and then either answers a single
//! request given on the command line or runs a prompt loop that plays the
//! role of the estimate form.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use home_price::app::{render, EstimateApp};
use home_price::{EstimateRequest, EstimatorConfig};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate Bangalore home prices in Lakhs")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the schema and model files
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Schema file name inside the artifacts directory
    #[arg(long)]
    columns_file: Option<String>,

    /// Model file name inside the artifacts directory
    #[arg(long)]
    model_file: Option<String>,

    /// Location name; when given, estimate once and exit
    #[arg(long)]
    location: Option<String>,

    /// Area in square feet
    #[arg(long)]
    sqft: Option<f64>,

    /// Bedroom count
    #[arg(long)]
    bhk: Option<u32>,

    /// Bathroom count
    #[arg(long)]
    bath: Option<u32>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => EstimatorConfig::load(path)?,
            None => EstimatorConfig::default(),
        };
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts_dir = dir.clone();
        }
        if let Some(name) = &self.columns_file {
            config.columns_file = name.clone();
        }
        if let Some(name) = &self.model_file {
            config.model_file = name.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = args.config()?;
    let paths = config.artifact_paths();
    let app = EstimateApp::load(config).with_context(|| {
        format!(
            "Artifact files not found or unreadable. Ensure '{}' and '{}' exist",
            paths.columns.display(),
            paths.model.display()
        )
    })?;
    info!("{} locations available", app.artifacts().locations().len());

    let Some(location) = args.location.clone() else {
        app.run(io::stdin().lock(), io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    };

    let form = &app.config().form;
    let request = EstimateRequest {
        location,
        sqft: Some(args.sqft.unwrap_or(form.default_sqft)),
        bhk: args.bhk.unwrap_or(form.default_bhk),
        bath: args.bath.unwrap_or(form.default_bath),
    };
    let result = app.submit(&request);
    let message = render(&request, &result);
    if result.is_ok() {
        println!("{message}");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{message}");
        Ok(ExitCode::FAILURE)
    }
}
