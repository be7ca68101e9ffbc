//! GitHub user lookup for `GET /api/profile/github/:username`

use anyhow::{Context, Result};
use reqwest::{header, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// Thin client for `GET {api}/users/{username}`
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
}

impl GithubClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("devconnector/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build GitHub client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public profile JSON for `username`, or `None` if GitHub has no such
    /// user, refuses the request, or cannot be reached.
    pub async fn user(&self, username: &str) -> Option<Value> {
        if !is_valid_username(username) {
            debug!("[GitHub] Rejected username {:?}", username);
            return None;
        }

        let url = format!("{}/users/{}", self.api_url, username);
        let response = match self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("[GitHub] Request to {} failed: {}", url, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!("[GitHub] {} answered {}", url, response.status());
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("[GitHub] Unreadable body from {}: {}", url, e);
                None
            }
        }
    }
}

/// GitHub logins: 1-39 alphanumerics or single hyphens, not at either end
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 39
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("rust-lang"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("-octo"));
        assert!(!is_valid_username("octo--cat"));
        assert!(!is_valid_username("../orgs"));
        assert!(!is_valid_username(&"a".repeat(40)));
    }

    #[tokio::test]
    async fn test_invalid_username_skips_network() {
        // unroutable base: would hang or fail if a request were made
        let client = GithubClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.user("not a user").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_none() {
        let client = GithubClient::new("http://127.0.0.1:9/").unwrap();
        assert!(client.user("octocat").await.is_none());
    }
}
