mod cli;
mod config;
mod domain;
mod infra;
mod media;
mod workflows;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Settings;
use infra::http::ReqwestFetcher;
use media::images::{normalize_directory, JpegCodec};
use workflows::pipeline::{create_output_dir, Pipeline};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli)?;

    if cli.normalize_only {
        create_output_dir(&settings.output_dir)?;
        let count = normalize_directory(&settings.output_dir, &JpegCodec)?;
        info!("Normalized {count} images in {:?}", settings.output_dir);
        return Ok(());
    }

    let Some(access_token) = settings.access_token.as_deref() else {
        eprintln!("{}", config::MISSING_TOKEN_MESSAGE);
        return Ok(());
    };

    let http = ReqwestFetcher::new()?;
    let pipeline = Pipeline::new(&http, &JpegCodec, &settings, access_token)?;
    pipeline.run()?;

    Ok(())
}
