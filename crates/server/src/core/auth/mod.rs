//! Authentication Module
//!
//! Session tokens (HS256 JWT carried in `x-auth-token`), bcrypt password
//! hashing and gravatar avatars. Nothing here touches the stores; the
//! handlers decide which user a token or password belongs to.

pub mod handlers;
pub mod middleware;

use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity carried inside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
}

/// Session token claims: `{ "user": { "id": ... }, "iat": ..., "exp": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session tokens and hashes passwords
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthManager {
    pub fn new(secret: &[u8], token_ttl_secs: i64, bcrypt_cost: u32) -> Result<Self> {
        let token_ttl = Duration::try_seconds(token_ttl_secs)
            .with_context(|| format!("Token TTL of {}s is out of range", token_ttl_secs))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl,
            bcrypt_cost,
        })
    }

    /// Issue a token for `user_id` expiring after the configured TTL
    pub fn issue_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.token_ttl)
            .context("Token expiry is out of range")?;
        let claims = Claims {
            user: TokenUser {
                id: user_id.to_string(),
            },
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        self.sign(&claims).context("Failed to sign token")
    }

    fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding_key)
    }

    /// Check signature and expiry, returning the claims on success
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        debug!("[Auth] Token verified for user {}", data.claims.user.id);
        Ok(data.claims)
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.bcrypt_cost).context("Failed to hash password")
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        verify(password, password_hash).context("Failed to verify password")
    }
}

/// Trimmed, lower-cased email used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gravatar URL for an email: 200px, PG rated, "mystery man" fallback
pub fn gravatar_url(email: &str) -> String {
    let digest = Md5::digest(normalize_email(email).as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}
