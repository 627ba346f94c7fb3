//! build-slicer-json: turn the download-statistics database into the JSON
//! document served to the statistics page.
//!
//! ```text
//! build-slicer-json slicer-stats.db slicer-stats.json
//! ```

mod cli;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use slicerstats_etl::{CountryIndex, ExtractOptions, Source};
use tracing::{error, info};

use crate::cli::Args;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging.log_level) {
        eprintln!("failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(format!(
            "warn,slicerstats={level},build_slicer_json={level}"
        ))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Settings for one run, after command-line flags are applied over the
/// configuration file.
#[derive(Debug)]
struct RunPlan {
    countries_file: Option<PathBuf>,
    options: ExtractOptions,
    pretty: bool,
}

impl RunPlan {
    fn resolve(args: &Args, config: &Config) -> Self {
        Self {
            countries_file: args.countries.clone().or_else(|| config.countries_file()),
            options: ExtractOptions {
                browser_type: args
                    .browser_type
                    .clone()
                    .unwrap_or_else(|| config.source.browser_type.clone()),
            },
            pretty: args.pretty || config.output.pretty,
        }
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let start = Instant::now();
    let plan = RunPlan::resolve(&args, &config);

    // 1. Country reference
    let countries = match &plan.countries_file {
        Some(path) => CountryIndex::load(path)
            .with_context(|| format!("loading country reference {}", path.display()))?,
        None => CountryIndex::builtin().context("loading built-in country reference")?,
    };
    info!("Using {} reference countries", countries.len());

    // 2. Source database must exist; opening read-only never creates it
    anyhow::ensure!(
        args.database.is_file(),
        "database {} does not exist",
        args.database.display()
    );

    // 3. Extract and write
    info!(
        "Extracting {} -> {}",
        args.database.display(),
        args.output.display()
    );
    slicerstats_etl::run(
        Source::File(args.database),
        Arc::new(countries),
        &plan.options,
        &args.output,
        plan.pretty,
    )
    .await
    .context("building statistics document")?;

    info!("Finished in {:.2?}", start.elapsed());
    Ok(())
}
