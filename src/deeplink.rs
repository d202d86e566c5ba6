//! Deep-link redirect handling
//!
//! The surrounding shell observes URLs from two trigger points: an OS-level
//! deep-link event (foreground or cold start) and the completion callback of
//! an in-app browser session. It invokes this handler exactly once per
//! observed URL and awaits the outcome before proceeding.
//!
//! A URL without a token pair is the common case - any deep link that is not
//! an auth callback - and is reported as [`RedirectOutcome::NotCallback`],
//! never as an error. Only a backend failure while redeeming an extracted
//! pair surfaces as an error; the shell then shows a generic
//! authentication-failed message and leaves the UI where it was.

use log::{debug, info};

use crate::auth::{AuthError, SessionEstablisher};
use crate::models::AuthSession;
use crate::redirect::extract_token_pair;

/// Outcome of processing one observed redirect URL
#[derive(Debug)]
pub enum RedirectOutcome {
    /// The URL carried no token pair; not an auth callback
    NotCallback,
    /// The URL carried a token pair and a session was established
    SessionEstablished(AuthSession),
}

pub struct DeepLinkHandler<E> {
    establisher: E,
}

impl<E: SessionEstablisher> DeepLinkHandler<E> {
    #[must_use]
    pub fn new(establisher: E) -> Self {
        Self { establisher }
    }

    /// Process one observed redirect URL
    ///
    /// # Errors
    ///
    /// Returns an error only when a token pair was extracted but the
    /// session-establishing collaborator rejected it or was unreachable.
    pub async fn handle_redirect(&self, url: &str) -> Result<RedirectOutcome, AuthError> {
        let Some(tokens) = extract_token_pair(url) else {
            debug!("Observed URL is not an auth callback");
            return Ok(RedirectOutcome::NotCallback);
        };

        let session = self.establisher.establish_session(&tokens).await?;
        info!("Auth callback handled, session established");
        Ok(RedirectOutcome::SessionEstablished(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock::MockSessionEstablisher;

    #[tokio::test]
    async fn test_non_callback_url_skips_establisher() {
        let mock = MockSessionEstablisher::succeeding();
        let handler = DeepLinkHandler::new(mock.clone());

        let outcome = handler.handle_redirect("bitbastion://home").await.unwrap();
        assert!(matches!(outcome, RedirectOutcome::NotCallback));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_callback_url_establishes_session() {
        let mock = MockSessionEstablisher::succeeding();
        let handler = DeepLinkHandler::new(mock.clone());

        let outcome = handler
            .handle_redirect("bitbastion://auth-callback#access_token=aaa&refresh_token=bbb")
            .await
            .unwrap();
        match outcome {
            RedirectOutcome::SessionEstablished(session) => {
                assert!(!session.access_token.is_empty());
            }
            RedirectOutcome::NotCallback => panic!("expected established session"),
        }
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.last_tokens().unwrap().access_token, "aaa");
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_error() {
        let mock = MockSessionEstablisher::failing("Invalid Refresh Token");
        let handler = DeepLinkHandler::new(mock.clone());

        let result = handler
            .handle_redirect("bitbastion://auth-callback#access_token=aaa&refresh_token=bbb")
            .await;
        assert!(matches!(result, Err(AuthError::Backend { .. })));
    }

    #[tokio::test]
    async fn test_partial_tokens_are_not_a_callback() {
        let mock = MockSessionEstablisher::succeeding();
        let handler = DeepLinkHandler::new(mock.clone());

        let outcome = handler
            .handle_redirect("bitbastion://auth-callback#access_token=onlyone")
            .await
            .unwrap();
        assert!(matches!(outcome, RedirectOutcome::NotCallback));
        assert_eq!(mock.calls(), 0);
    }
}
