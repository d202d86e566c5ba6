//! Auth backend HTTP client
//!
//! Thin async client for the hosted authentication service. It covers the
//! operations the login screen needs: password sign-in and sign-up, social
//! provider authorize URLs, establishing a session from an extracted token
//! pair, refreshing, and sign-out. Session persistence is owned by the
//! caller; this client holds no user state.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::auth::{AuthError, SessionEstablisher};
use crate::models::{AuthSession, AuthUser, TokenPair};
use crate::settings::BastionAuthSettings;
use crate::utils::jwt;

/// Error body shape used by the backend for auth failures
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(alias = "error")]
    msg: Option<String>,
    error_description: Option<String>,
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    publishable_key: String,
    redirect_uri: String,
}

impl AuthClient {
    /// Build a client from loaded settings
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the backend base URL or
    /// publishable key is missing.
    pub fn from_settings(settings: &BastionAuthSettings) -> Result<Self, AuthError> {
        if settings.backend.base_url.is_empty() {
            return Err(AuthError::Configuration(
                "backend base_url is not set".to_string(),
            ));
        }
        let publishable_key = settings.backend.get_publishable_key().ok_or_else(|| {
            AuthError::Configuration("backend publishable key is not set".to_string())
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: settings.backend.base_url.trim_end_matches('/').to_string(),
            publishable_key,
            redirect_uri: settings.redirect_uri(),
        })
    }

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the backend is
    /// unreachable.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        debug!("Password sign-in for {email}");
        let session = self
            .token_request(
                "password",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        info!("Signed in user: {}", session.user.id);
        Ok(session)
    }

    /// Register a new account with email and password
    ///
    /// Backends with email confirmation enabled return a user without a
    /// session; in that case the session fields are absent and this surfaces
    /// as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        debug!("Sign-up for {email}");
        let response = self
            .http
            .post(self.endpoint("signup"))
            .header("apikey", &self.publishable_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status.as_u16(), &body));
        }

        match serde_json::from_str::<AuthSession>(&body) {
            Ok(session) => {
                info!("Signed up user: {}", session.user.id);
                Ok(Some(session))
            }
            Err(_) => {
                // Confirmation-required flow: body is the bare user object
                let user: AuthUser = serde_json::from_str(&body)
                    .map_err(|e| AuthError::InvalidResponse(format!("signup body: {e}")))?;
                info!("Signed up user {} (confirmation pending)", user.id);
                Ok(None)
            }
        }
    }

    /// Establish a session from a token pair recovered from a redirect URL
    ///
    /// If the access token is still valid, the session is rebuilt around it
    /// by fetching the user it belongs to; otherwise the refresh token is
    /// redeemed for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if both tokens are unusable or the backend is
    /// unreachable.
    pub async fn set_session(&self, tokens: &TokenPair) -> Result<AuthSession, AuthError> {
        let still_valid = jwt::token_expiry(&tokens.access_token)
            .is_some_and(|exp| exp > chrono::Utc::now());

        if still_valid {
            debug!("Access token still valid, rebuilding session around it");
            match self.session_from_access_token(tokens).await {
                Ok(session) => return Ok(session),
                Err(e) => warn!("Rebuild from access token failed, refreshing instead: {e}"),
            }
        }

        self.refresh_session(&tokens.refresh_token).await
    }

    /// Redeem a refresh token for a fresh session
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is expired, revoked, or the
    /// backend is unreachable.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        debug!("Redeeming refresh token");
        let session = self
            .token_request("refresh_token", &json!({ "refresh_token": refresh_token }))
            .await?;
        info!("Session established for user: {}", session.user.id);
        Ok(session)
    }

    /// Build the hosted authorize URL for a social provider sign-in
    ///
    /// The shell opens this URL in an in-app browser session; the provider
    /// redirects back to the configured deep link with the tokens.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the base URL does not form a
    /// valid authorize URL.
    pub fn authorize_url(&self, provider: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(&format!("{}/auth/v1/authorize", self.base_url))
            .map_err(|e| AuthError::Configuration(format!("invalid base_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", &self.redirect_uri);
        debug!("Built authorize URL for provider {provider}");
        Ok(url.into())
    }

    /// Revoke the session server-side
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the sign-out request.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::backend_error(status.as_u16(), &body));
        }
        info!("Session revoked");
        Ok(())
    }

    /// The deep-link redirect URI this client hands to the backend
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    async fn token_request(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type={grant_type}",
                self.base_url
            ))
            .header("apikey", &self.publishable_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(format!("token body: {e}")))
    }

    /// Rebuild a session around a still-valid access token by fetching the
    /// user it belongs to
    async fn session_from_access_token(
        &self,
        tokens: &TokenPair,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", &self.publishable_key)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status.as_u16(), &text));
        }
        let user: AuthUser = serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(format!("user body: {e}")))?;

        let expires_at = jwt::token_expiry(&tokens.access_token).map(|dt| dt.timestamp());
        let expires_in = expires_at
            .map_or(0, |ts| ts - chrono::Utc::now().timestamp())
            .max(0);

        Ok(AuthSession {
            access_token: tokens.access_token.clone(),
            token_type: "bearer".to_string(),
            expires_in,
            expires_at,
            refresh_token: tokens.refresh_token.clone(),
            user,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn backend_error(status: u16, body: &str) -> AuthError {
        let message = serde_json::from_str::<BackendErrorBody>(body)
            .ok()
            .and_then(|b| b.error_description.or(b.msg))
            .unwrap_or_else(|| body.chars().take(200).collect());
        AuthError::Backend { status, message }
    }
}

#[async_trait]
impl SessionEstablisher for AuthClient {
    async fn establish_session(&self, tokens: &TokenPair) -> Result<AuthSession, AuthError> {
        self.set_session(tokens).await
    }
}
