// GitHub API endpoint functions.
// Paginated repository listing and subscriber count resolution.

use log::warn;

use crate::error::{GhStatsError, Result};

use super::client::GitHubClient;
use super::types::Repository;

/// Fixed page size for the repository listing endpoint.
const PER_PAGE: u32 = 100;

impl GitHubClient {
    /// Get one page of a user's repositories.
    pub async fn user_repos_page(&self, username: &str, page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", username), &params)
            .await?;
        let body = response.text().await.map_err(GhStatsError::Api)?;
        serde_json::from_str(&body).map_err(GhStatsError::Decode)
    }

    /// Get every repository owned by `username`.
    ///
    /// Pages through the listing endpoint until a page comes back empty.
    /// All-or-nothing: any page failing (including rate-limit exhaustion)
    /// fails the whole call and discards earlier pages.
    pub async fn all_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let mut all_repos = Vec::new();
        let mut page = 1;

        loop {
            let repos = self.user_repos_page(username, page).await?;
            if repos.is_empty() {
                break;
            }
            all_repos.extend(repos);
            page += 1;
        }

        Ok(all_repos)
    }

    /// Resolve the true watcher count for a repository.
    ///
    /// The count is the length of the subscribers listing; no pagination is
    /// performed, so counts above one page are approximate. Returns `None`
    /// on any failure so one repository cannot block the batch.
    pub async fn subscriber_count(&self, subscribers_url: &str) -> Option<u64> {
        match self.try_subscriber_count(subscribers_url).await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!("subscriber lookup failed for {}: {}", subscribers_url, err);
                None
            }
        }
    }

    async fn try_subscriber_count(&self, subscribers_url: &str) -> Result<u64> {
        let response = self.get_url(subscribers_url).await?;
        let body = response.text().await.map_err(GhStatsError::Api)?;
        let subscribers: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(GhStatsError::Decode)?;
        Ok(subscribers.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn repo_json(name: &str, stars: u64) -> serde_json::Value {
        json!({
            "name": name,
            "stargazers_count": stars,
            "watchers_count": stars,
            "forks_count": 1,
            "open_issues_count": 0,
            "subscribers_url": format!("https://api.github.com/repos/octo/{}/subscribers", name),
            "owner": { "login": "octo" }
        })
    }

    #[tokio::test]
    async fn all_user_repos_pages_until_empty() {
        let server = MockServer::start();
        let page1 = server.mock(|when, then| {
            when.method("GET")
                .path("/users/octo/repos")
                .query_param("page", "1");
            then.status(200)
                .header("x-ratelimit-remaining", "42")
                .json_body(json!([repo_json("alpha", 10), repo_json("beta", 2)]));
        });
        let page2 = server.mock(|when, then| {
            when.method("GET")
                .path("/users/octo/repos")
                .query_param("page", "2");
            then.status(200)
                .header("x-ratelimit-remaining", "41")
                .json_body(json!([]));
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();
        let repos = client.all_user_repos("octo").await.unwrap();

        page1.assert();
        page2.assert();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "alpha");
        assert_eq!(repos[0].stargazers_count, 10);
        assert_eq!(repos[1].owner.login, "octo");
    }

    #[tokio::test]
    async fn rate_limit_on_later_page_discards_earlier_pages() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET")
                .path("/users/octo/repos")
                .query_param("page", "1");
            then.status(200)
                .header("x-ratelimit-remaining", "1")
                .json_body(json!([repo_json("alpha", 10)]));
        });
        server.mock(|when, then| {
            when.method("GET")
                .path("/users/octo/repos")
                .query_param("page", "2");
            then.status(200)
                .header("x-ratelimit-remaining", "0")
                .header("x-ratelimit-reset", "1700000000")
                .json_body(json!([repo_json("beta", 2)]));
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();
        let err = client.all_user_repos("octo").await.unwrap_err();

        match err {
            GhStatsError::RateLimited { reset_at } => {
                assert_eq!(reset_at.timestamp(), 1_700_000_000);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_fails_the_fetch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/users/ghost/repos");
            then.status(404).header("x-ratelimit-remaining", "42");
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();
        let err = client.all_user_repos("ghost").await.unwrap_err();

        assert!(matches!(err, GhStatsError::Status { status, .. } if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/users/octo/repos");
            then.status(200)
                .header("x-ratelimit-remaining", "42")
                .body("not json");
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();
        let err = client.all_user_repos("octo").await.unwrap_err();

        assert!(matches!(err, GhStatsError::Decode(_)));
    }

    #[tokio::test]
    async fn subscriber_count_is_listing_length() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/repos/octo/alpha/subscribers");
            then.status(200)
                .header("x-ratelimit-remaining", "42")
                .json_body(json!([{"login": "a"}, {"login": "b"}, {"login": "c"}]));
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();
        let url = format!("{}/repos/octo/alpha/subscribers", server.base_url());

        assert_eq!(client.subscriber_count(&url).await, Some(3));
    }

    #[tokio::test]
    async fn subscriber_count_failure_degrades_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/repos/octo/alpha/subscribers");
            then.status(500).header("x-ratelimit-remaining", "42");
        });
        server.mock(|when, then| {
            when.method("GET").path("/repos/octo/beta/subscribers");
            then.status(200)
                .header("x-ratelimit-remaining", "42")
                .json_body(json!({"not": "an array"}));
        });

        let client = GitHubClient::with_base_url(server.base_url()).unwrap();

        let failed = format!("{}/repos/octo/alpha/subscribers", server.base_url());
        let not_array = format!("{}/repos/octo/beta/subscribers", server.base_url());
        assert_eq!(client.subscriber_count(&failed).await, None);
        assert_eq!(client.subscriber_count(&not_array).await, None);
    }
}
