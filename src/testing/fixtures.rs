//! Test fixtures providing pre-built test objects

use chrono::Utc;

use crate::models::{AuthSession, AuthUser, TokenPair};
use crate::settings::{BackendSettings, BastionAuthSettings};

use super::constants::{TEST_ACCESS_TOKEN, TEST_EMAIL, TEST_REFRESH_TOKEN, TEST_USER_ID};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Create settings with a configured backend
    #[must_use]
    pub fn settings() -> BastionAuthSettings {
        BastionAuthSettings {
            backend: BackendSettings {
                base_url: "https://test-project.supabase.co".to_string(),
                publishable_key: Some("test-publishable-key".to_string()),
                publishable_key_env: None,
            },
            ..BastionAuthSettings::default()
        }
    }

    /// Create a standard token pair
    ///
    /// # Panics
    ///
    /// Never panics; the fixture values are non-empty.
    #[must_use]
    pub fn token_pair() -> TokenPair {
        TokenPair::new(TEST_ACCESS_TOKEN.to_string(), TEST_REFRESH_TOKEN.to_string()).unwrap()
    }

    /// Create an established session
    #[must_use]
    pub fn session() -> AuthSession {
        AuthSession {
            access_token: TEST_ACCESS_TOKEN.to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: Some(Utc::now().timestamp() + 3600),
            refresh_token: TEST_REFRESH_TOKEN.to_string(),
            user: Self::user(),
        }
    }

    /// Create an expired session for testing expiry logic
    #[must_use]
    pub fn expired_session() -> AuthSession {
        let mut session = Self::session();
        session.expires_at = Some(Utc::now().timestamp() - 3600);
        session
    }

    /// Create a standard user
    #[must_use]
    pub fn user() -> AuthUser {
        AuthUser {
            id: TEST_USER_ID.to_string(),
            email: Some(TEST_EMAIL.to_string()),
            user_metadata: serde_json::Value::Null,
            created_at: Some(Utc::now()),
        }
    }

    /// A fragment-style auth callback URL carrying the standard token pair
    #[must_use]
    pub fn fragment_callback_url() -> String {
        format!(
            "bitbastion://auth-callback#access_token={TEST_ACCESS_TOKEN}&refresh_token={TEST_REFRESH_TOKEN}&token_type=bearer&expires_in=3600"
        )
    }

    /// A query-style auth callback URL carrying the standard token pair
    #[must_use]
    pub fn query_callback_url() -> String {
        format!(
            "bitbastion://auth-callback?access_token={TEST_ACCESS_TOKEN}&refresh_token={TEST_REFRESH_TOKEN}"
        )
    }

    /// A deep link that is not an auth callback (cold-start launch URL)
    #[must_use]
    pub fn launch_url() -> String {
        "bitbastion://home".to_string()
    }
}
