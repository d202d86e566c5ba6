//! Hosted auth backend integration
//!
//! This module provides the client for the hosted authentication service
//! (`GoTrue`-style API) plus the trait seam the deep-link handler uses to
//! establish a session from an extracted token pair.

pub mod client;

pub use client::AuthClient;

use std::fmt;

use async_trait::async_trait;

use crate::models::{AuthSession, TokenPair};

/// Authentication errors
#[derive(Debug)]
pub enum AuthError {
    /// Network or transport failure talking to the backend
    Http(reqwest::Error),
    /// Backend rejected the request (non-2xx with an error body)
    Backend { status: u16, message: String },
    /// Backend returned a body this client could not interpret
    InvalidResponse(String),
    /// Client is missing its base URL or publishable key
    Configuration(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Http(err) => write!(f, "HTTP error: {err}"),
            AuthError::Backend { status, message } => {
                write!(f, "Auth backend error ({status}): {message}")
            }
            AuthError::InvalidResponse(msg) => write!(f, "Invalid backend response: {msg}"),
            AuthError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err)
    }
}

/// Session-establishing collaborator
///
/// The deep-link handler only needs one operation from the auth service:
/// turn an extracted token pair into an established session. Keeping it
/// behind a trait lets tests drive the handler without a live backend.
#[async_trait]
pub trait SessionEstablisher: Send + Sync {
    /// Establish a session from a token pair recovered from a redirect URL
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the tokens or is unreachable.
    async fn establish_session(&self, tokens: &TokenPair) -> Result<AuthSession, AuthError>;
}
