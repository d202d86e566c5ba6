//! Common authentication data types
//!
//! This module provides the data structures shared between the redirect
//! extractor, the auth backend client, and the deep-link handler.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Access/refresh token pair recovered from an OAuth redirect URL
///
/// Both values are guaranteed non-empty and percent-decoded. The pair is
/// consumed immediately by the session-establishing collaborator and is
/// never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Build a token pair, enforcing the both-or-nothing policy
    ///
    /// Returns `None` if either value is empty; a redirect that carries only
    /// one of the two tokens must never partially establish a session.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String) -> Option<Self> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return None;
        }
        Some(Self {
            access_token,
            refresh_token,
        })
    }
}

/// Authenticated user as returned by the hosted auth backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Established session as returned by the backend token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// Unix timestamp of expiry; newer backend versions send it directly
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl AuthSession {
    /// Expiry time of the access token
    ///
    /// Prefers the backend-supplied `expires_at` timestamp, then the `exp`
    /// claim of the access token itself, and finally falls back to
    /// "now + `expires_in`".
    #[must_use]
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        if let Some(ts) = self.expires_at {
            if let Some(dt) = DateTime::from_timestamp(ts, 0) {
                return dt;
            }
        }
        if let Some(exp) = jwt::token_expiry(&self.access_token) {
            return exp;
        }
        Utc::now() + Duration::seconds(self.expires_in)
    }

    /// Whether the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at_utc() <= Utc::now()
    }

    /// Token pair suitable for re-establishing this session later
    #[must_use]
    pub fn token_pair(&self) -> Option<TokenPair> {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}
