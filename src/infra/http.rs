use anyhow::{bail, Context, Result};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("poster-database/", env!("CARGO_PKG_VERSION"));

/// Blocking GET capability. Implementations return the body of a 2xx
/// response and fail on anything else.
pub trait HttpFetch {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .with_context(|| format!("Request to {url} failed"))?;

        if !response.status().is_success() {
            bail!("GET {url} failed: HTTP {}", response.status());
        }

        let body = response
            .bytes()
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub mod fake {
    use super::HttpFetch;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned responses keyed by exact URL. Records every request it sees.
    #[derive(Default)]
    pub struct FakeHttp {
        responses: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeHttp {
        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests
                .borrow()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    impl HttpFetch for FakeHttp {
        fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("GET {url} failed: HTTP 404 Not Found"))
        }
    }
}
