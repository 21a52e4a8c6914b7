use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::models::{ApiConfiguration, PosterLookup, PosterPath};
use crate::infra::http::HttpFetch;

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const SEARCH_LANGUAGE: &str = "en-US";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<MovieResult>>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    poster_path: Option<PosterPath>,
}

/// Authenticated TMDB v3 client. Borrows the HTTP capability and the token.
pub struct TmdbClient<'a, H: HttpFetch> {
    http: &'a H,
    access_token: &'a str,
}

impl<'a, H: HttpFetch> TmdbClient<'a, H> {
    pub fn new(http: &'a H, access_token: &'a str) -> Self {
        Self { http, access_token }
    }

    fn call_api<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{TMDB_API_BASE}/{endpoint}");
        let authorization = format!("Bearer {}", self.access_token);
        let body = self.http.get(
            &url,
            &[
                ("Accept", "application/json"),
                ("Authorization", authorization.as_str()),
            ],
        )?;
        serde_json::from_slice(&body)
            .with_context(|| format!("Unexpected TMDB response from {endpoint}"))
    }

    /// Image base URL and sizes; fetched once and reused for every poster.
    pub fn get_configuration(&self) -> Result<ApiConfiguration> {
        self.call_api("configuration")
    }

    /// Poster of the first search hit for `title`.
    ///
    /// Ambiguous titles (remakes, sequels) are not disambiguated.
    pub fn find_poster(&self, title: &str) -> Result<PosterLookup> {
        let endpoint = format!(
            "search/movie?query={}&include_adult=false&language={SEARCH_LANGUAGE}&page=1",
            urlencoding::encode(title)
        );
        let response: SearchResponse = self.call_api(&endpoint)?;

        let poster = response
            .results
            .and_then(|results| results.into_iter().next())
            .and_then(|first| first.poster_path);

        match poster {
            Some(path) => {
                debug!("Resolved \"{title}\" to {}", path.as_str());
                Ok(PosterLookup::Found(path))
            }
            None => Ok(PosterLookup::NotFound),
        }
    }
}
