use serde::Deserialize;

/// Path fragment TMDB uses to identify a poster, e.g. `/abc123.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PosterPath(pub String);

impl PosterPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterLookup {
    Found(PosterPath),
    NotFound,
}

/// Subset of TMDB's `/configuration` response needed to build image URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfiguration {
    pub images: ImagesConfiguration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfiguration {
    pub base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}
