use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::domain::models::{ApiConfiguration, PosterLookup};
use crate::infra::http::HttpFetch;

/// TMDB size descriptor for downloaded posters.
pub const POSTER_SIZE: &str = "w342";

#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded(PathBuf),
    /// The search returned no poster; nothing was written.
    MissingPoster { filename: String },
}

pub fn poster_url(configuration: &ApiConfiguration, poster_path: &str) -> String {
    format!(
        "{}{POSTER_SIZE}{poster_path}",
        configuration.images.base_url
    )
}

/// Download the poster for `lookup` to `destination`.
///
/// Bytes go to a temp file next to `destination` and are moved into place
/// once complete.
pub fn fetch_poster<H: HttpFetch>(
    http: &H,
    configuration: &ApiConfiguration,
    lookup: &PosterLookup,
    destination: &Path,
) -> Result<FetchOutcome> {
    let PosterLookup::Found(poster_path) = lookup else {
        let filename = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| destination.display().to_string());
        warn!("poster_path was not set for {filename}. Look up why!");
        return Ok(FetchOutcome::MissingPoster { filename });
    };

    let url = poster_url(configuration, poster_path.as_str());
    let bytes = http.get(&url, &[])?;

    let directory = destination.parent().unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(&bytes)?;
    temp.persist(destination)
        .with_context(|| format!("Failed to write {destination:?}"))?;

    Ok(FetchOutcome::Downloaded(destination.to_path_buf()))
}
