//! `snow-genius` entry-point: loads settings and the resort catalog, then
//! scores a form or lists matching resorts.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use resort_catalog::ResortCatalog;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use snow_genius::config::{SnowGeniusSettings, resolve_endpoint};
use snow_genius::domain::SubmissionService;
use snow_genius::inbound::cli::{
    Cli, Command, ResortsArgs, ScoreArgs, ScoreOutput, run_score, write_suggestions,
};
use snow_genius::outbound::catalog::{CatalogLoader, CatalogSource};
use snow_genius::outbound::scoring::ScoringHttpSource;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = SnowGeniusSettings::load_from_iter([OsString::from("snow-genius")])
        .wrap_err("failed to load settings")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(cli, settings))
}

async fn run(cli: Cli, settings: SnowGeniusSettings) -> Result<()> {
    let timeout = cli
        .timeout_secs
        .filter(|secs| *secs > 0)
        .map_or_else(|| settings.timeout(), Duration::from_secs);
    let source = cli
        .catalog
        .as_deref()
        .unwrap_or_else(|| settings.catalog())
        .parse::<CatalogSource>()?;
    let loader = CatalogLoader::new(timeout).wrap_err("failed to build HTTP client")?;

    match cli.command {
        Command::Resorts(ResortsArgs { query }) => {
            let catalog = loader.load(&source).await?;
            write_suggestions(&catalog, &query, &mut io::stdout().lock())?;
            Ok(())
        }
        Command::Score(args) => {
            let catalog = match loader.load(&source).await {
                Ok(catalog) => catalog,
                Err(error) => {
                    warn!(%source, %error, "resort catalog unavailable; resolving resorts by slug");
                    ResortCatalog::default()
                }
            };
            score(args, &settings, &catalog, timeout).await
        }
    }
}

async fn score(
    args: ScoreArgs,
    settings: &SnowGeniusSettings,
    catalog: &ResortCatalog,
    timeout: Duration,
) -> Result<()> {
    let mode = match args.mode {
        Some(mode) => mode,
        None => settings.mode()?,
    };
    let endpoint = resolve_endpoint(args.api_url.as_deref(), &DefaultEnv::new(), mode)?;
    let source =
        ScoringHttpSource::new(endpoint, timeout).wrap_err("failed to build HTTP client")?;
    let service = SubmissionService::new(Arc::new(source), mode);
    let form = args.form_state()?;
    let output = ScoreOutput {
        dev_mode: args.dev || settings.dev_mode,
        dry_run: args.dry_run,
    };

    run_score(&service, &form, catalog, output, &mut io::stdout().lock()).await?;
    Ok(())
}
