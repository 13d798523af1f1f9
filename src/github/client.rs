// GitHub API HTTP client.
// Handles rate limit detection and request/response processing.

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{GhStatsError, Result};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with per-response rate limit checking.
///
/// Requests are unauthenticated; the tool runs against the public quota.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client pointed at the public GitHub API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE)
    }

    /// Create a client pointed at an arbitrary base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("ghstats"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(GhStatsError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Make a GET request to an endpoint path with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(GhStatsError::Api)?;

        Self::check_rate_limit(&response)?;
        Self::check_status(response)
    }

    /// Make a GET request to an absolute URL (e.g. a `subscribers_url`).
    pub async fn get_url(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(GhStatsError::Api)?;

        Self::check_rate_limit(&response)?;
        Self::check_status(response)
    }

    /// Fail with `RateLimited` once the remaining quota reaches zero.
    ///
    /// Runs before the status check and before the body is touched, so an
    /// exhausted quota aborts even a page that came back 200.
    fn check_rate_limit(response: &Response) -> Result<()> {
        let rate_limit = RateLimit::from_headers(response.headers());
        if rate_limit.remaining == 0 {
            return Err(GhStatsError::RateLimited {
                reset_at: rate_limit.reset_at(),
            });
        }
        Ok(())
    }

    /// Check response status and convert non-success to an error.
    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GhStatsError::Status {
                status,
                url: response.url().to_string(),
            })
        }
    }
}
