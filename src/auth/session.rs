use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db as queries;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Hash a session token with the server secret.
///
/// Only this hash is stored, so a leaked database does not yield usable
/// cookies, and changing the secret invalidates every session.
#[must_use]
pub fn hash_session_token(secret: &str, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Creates, resolves and destroys admin sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    pool: SqlitePool,
    secret: String,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionManager {
    #[must_use]
    pub fn new(pool: SqlitePool, secret: &str, ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            pool,
            secret: secret.to_string(),
            ttl,
            secure_cookies,
        }
    }

    /// Start an admin session and return the token to hand to the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the session row cannot be written.
    pub async fn create_admin_session(&self) -> Result<String> {
        let token = generate_session_token();
        let ttl = chrono::Duration::from_std(self.ttl).context("Session lifetime out of range")?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .context("Session expiry is out of range")?
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        queries::create_session(&self.pool, &self.token_hash(&token), true, &expires_at).await?;
        Ok(token)
    }

    /// Whether `token` belongs to a live admin session.
    ///
    /// Expired sessions are deleted when encountered.
    ///
    /// # Errors
    ///
    /// Returns an error if the session table cannot be read.
    pub async fn is_admin(&self, token: &str) -> Result<bool> {
        let token_hash = self.token_hash(token);
        let Some(session) = queries::get_session_by_token_hash(&self.pool, &token_hash).await?
        else {
            return Ok(false);
        };

        let expired = DateTime::parse_from_rfc3339(&session.expires_at)
            .map_or(true, |expires_at| expires_at <= Utc::now());
        if expired {
            debug!(session_id = session.id, "Dropping expired session");
            queries::delete_session(&self.pool, &token_hash).await?;
            return Ok(false);
        }

        queries::update_session_last_used(&self.pool, session.id).await?;
        Ok(session.is_admin)
    }

    /// End the session for `token`. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session row cannot be deleted.
    pub async fn destroy(&self, token: &str) -> Result<()> {
        queries::delete_session(&self.pool, &self.token_hash(token)).await?;
        Ok(())
    }

    /// `Set-Cookie` value that stores `token` for the session lifetime.
    #[must_use]
    pub fn session_cookie(&self, token: &str) -> String {
        let max_age = self.ttl.as_secs();
        format!(
            "{SESSION_COOKIE}={token}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={max_age}",
            self.secure_attr()
        )
    }

    /// `Set-Cookie` value that removes the session cookie.
    #[must_use]
    pub fn clear_cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
            self.secure_attr()
        )
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure_cookies {
            " Secure;"
        } else {
            ""
        }
    }

    fn token_hash(&self, token: &str) -> String {
        hash_session_token(&self.secret, token)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
