// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses and the
// snapshot shape persisted in history and cache documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub user or organization that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Repository as returned by the listing endpoint.
///
/// The API's `watchers_count` field mirrors the star count, so it is not
/// deserialized here; the real figure comes from the subscribers endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub subscribers_url: String,
    pub owner: Owner,
}

/// A repository's metric values captured at one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub name: String,
    pub stars: u64,
    /// Resolved subscriber count; `None` when the lookup failed.
    pub watchers: Option<u64>,
    pub forks: u64,
    pub open_issues: u64,
    pub owner: Owner,
    pub subscribers_url: String,
    pub last_fetched: DateTime<Utc>,
}

impl RepoSnapshot {
    /// Build a snapshot from a listing-endpoint repository and its resolved
    /// watcher count.
    pub fn from_repository(
        repo: &Repository,
        watchers: Option<u64>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: repo.name.clone(),
            stars: repo.stargazers_count,
            watchers,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            owner: repo.owner.clone(),
            subscribers_url: repo.subscribers_url.clone(),
            last_fetched: fetched_at,
        }
    }
}

/// Rate limit information from response headers.
///
/// A missing `X-RateLimit-Remaining` header reads as zero remaining.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimit {
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Parse rate limit headers from a response.
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self { remaining, reset }
    }

    /// Reset time as a UTC timestamp.
    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset as i64, 0).unwrap_or_default()
    }
}
