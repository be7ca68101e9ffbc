//! Server configuration

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::auth::AuthManager;
use crate::core::store::{PostStore, ProfileStore, UserStore};
use crate::profile::github::GithubClient;

/// Configuration for the DevConnector server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Root directory of the document collections
    pub data_dir: PathBuf,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Base URL of the GitHub REST API
    pub github_api_url: String,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 4000;
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
    pub const DEFAULT_BCRYPT_COST: u32 = 10;
    pub const DEFAULT_GITHUB_API_URL: &'static str = "https://api.github.com";
    /// One year
    pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;
    pub const MIN_BCRYPT_COST: u32 = 4;
    pub const MAX_BCRYPT_COST: u32 = 31;

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = parse_or(&lookup, "PORT", Self::DEFAULT_PORT)?;
        let token_ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", Self::DEFAULT_TOKEN_TTL_SECS)?;
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", Self::DEFAULT_BCRYPT_COST)?;

        if !(1..=Self::MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(anyhow!(
                "TOKEN_TTL_SECS must be between 1 and {}, got {}",
                Self::MAX_TOKEN_TTL_SECS,
                token_ttl_secs
            ));
        }
        if !(Self::MIN_BCRYPT_COST..=Self::MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(anyhow!(
                "BCRYPT_COST must be between {} and {}, got {}",
                Self::MIN_BCRYPT_COST,
                Self::MAX_BCRYPT_COST,
                bcrypt_cost
            ));
        }

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        Ok(Self {
            port,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            github_api_url: lookup("GITHUB_API_URL")
                .unwrap_or_else(|| Self::DEFAULT_GITHUB_API_URL.to_string()),
        })
    }

    /// Fast configuration rooted at `data_dir`, for tests
    pub fn for_tests(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            port: 0,
            data_dir: data_dir.into(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_secs: Self::DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: Self::MIN_BCRYPT_COST,
            github_api_url: Self::DEFAULT_GITHUB_API_URL.to_string(),
        }
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {:?}", self.data_dir))?;
        Ok(())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub auth: Arc<AuthManager>,
    pub users: Arc<UserStore>,
    pub profiles: Arc<ProfileStore>,
    pub posts: Arc<PostStore>,
    pub github: Arc<GithubClient>,
}

impl AppState {
    /// Open every collection under `config.data_dir` and wire the services
    pub async fn open(config: ServerConfig) -> Result<Self> {
        config.ensure_dirs().await?;

        let users = UserStore::open(&config.data_dir).await?;
        let profiles = ProfileStore::open(&config.data_dir).await?;
        let posts = PostStore::open(&config.data_dir).await?;

        let auth = AuthManager::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_secs,
            config.bcrypt_cost,
        )?;
        let github = GithubClient::new(&config.github_api_url)?;

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            users: Arc::new(users),
            profiles: Arc::new(profiles),
            posts: Arc::new(posts),
            github: Arc::new(github),
        })
    }
}
