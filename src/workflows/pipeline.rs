use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::models::ApiConfiguration;
use crate::domain::titles::{extract_titles, TitleNormalizer};
use crate::infra::http::HttpFetch;
use crate::infra::tmdb::TmdbClient;
use crate::media::images::{normalize_directory, ImageCodec};
use crate::workflows::fetcher::{fetch_poster, FetchOutcome, POSTER_SIZE};
use crate::workflows::filenames::poster_filename;

pub const LISTING_FILENAME: &str = "boxofficemojoustop1000.tsv";

/// Pause between titles so TMDB is not hammered.
pub const REQUEST_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub titles: usize,
    pub downloaded: usize,
    pub missing: usize,
    pub normalized: usize,
}

pub struct Pipeline<'a, H: HttpFetch, C: ImageCodec> {
    http: &'a H,
    codec: &'a C,
    tmdb: TmdbClient<'a, H>,
    normalizer: TitleNormalizer,
    output_dir: PathBuf,
    listing_url: String,
    delay: Duration,
}

impl<'a, H: HttpFetch, C: ImageCodec> Pipeline<'a, H, C> {
    pub fn new(http: &'a H, codec: &'a C, settings: &Settings, access_token: &'a str) -> Result<Self> {
        let normalizer = TitleNormalizer::with_overrides(settings.title_overrides.clone())?;
        Ok(Self {
            http,
            codec,
            tmdb: TmdbClient::new(http, access_token),
            normalizer,
            output_dir: settings.output_dir.clone(),
            listing_url: settings.listing_url.clone(),
            delay: REQUEST_DELAY,
        })
    }

    pub fn run(&self) -> Result<RunSummary> {
        create_output_dir(&self.output_dir)?;

        let listing_path = self.download_listing()?;
        let configuration = self.tmdb.get_configuration()?;
        if !configuration
            .images
            .poster_sizes
            .iter()
            .any(|size| size == POSTER_SIZE)
        {
            warn!(
                "TMDB does not advertise poster size {POSTER_SIZE} (available: {:?})",
                configuration.images.poster_sizes
            );
        }

        let content = fs::read_to_string(&listing_path)
            .with_context(|| format!("Failed to read {listing_path:?}"))?;
        let titles = extract_titles(&content, &self.normalizer)?;
        info!("Found {} titles in {LISTING_FILENAME}", titles.len());

        let mut summary = RunSummary {
            titles: titles.len(),
            ..Default::default()
        };
        let mut missing = Vec::new();

        for title in &titles {
            match self.process_title(&configuration, title)? {
                FetchOutcome::Downloaded(path) => {
                    debug!("Saved {path:?}");
                    summary.downloaded += 1;
                }
                FetchOutcome::MissingPoster { filename } => missing.push(filename),
            }
            info!("Finished: {title}");
            thread::sleep(self.delay);
        }

        summary.missing = missing.len();
        if !missing.is_empty() {
            warn!("No poster found for: {}", missing.join(", "));
        }

        summary.normalized = normalize_directory(&self.output_dir, self.codec)?;

        info!(
            "Done: {} titles, {} posters downloaded, {} missing, {} images normalized",
            summary.titles, summary.downloaded, summary.missing, summary.normalized
        );
        Ok(summary)
    }

    fn download_listing(&self) -> Result<PathBuf> {
        info!("Downloading movie list from {}", self.listing_url);
        let body = self.http.get(&self.listing_url, &[])?;
        let path = self.output_dir.join(LISTING_FILENAME);
        fs::write(&path, body).with_context(|| format!("Failed to write {path:?}"))?;
        Ok(path)
    }

    fn process_title(&self, configuration: &ApiConfiguration, title: &str) -> Result<FetchOutcome> {
        let lookup = self.tmdb.find_poster(title)?;
        let destination = self.output_dir.join(poster_filename(title));
        fetch_poster(self.http, configuration, &lookup, &destination)
    }
}

/// Create `dir` (and parents); an existing directory is fine.
pub fn create_output_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to create output directory {dir:?}")),
    }
}
