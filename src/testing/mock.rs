//! Mock collaborators for isolated testing

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{AuthError, SessionEstablisher};
use crate::models::{AuthSession, TokenPair};
use crate::testing::TestFixtures;

#[derive(Clone)]
enum MockBehavior {
    Succeed(AuthSession),
    Fail(String),
}

/// Recording mock for the session-establishing collaborator
///
/// Records every token pair it is handed so tests can assert the handler
/// invokes it exactly once per observed callback URL.
#[derive(Clone)]
pub struct MockSessionEstablisher {
    behavior: MockBehavior,
    seen: Arc<Mutex<Vec<TokenPair>>>,
}

impl MockSessionEstablisher {
    /// Mock that establishes the standard fixture session
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_session(TestFixtures::session())
    }

    /// Mock that establishes a specific session
    #[must_use]
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            behavior: MockBehavior::Succeed(session),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that rejects every token pair with a backend error
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.to_string()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times the mock was invoked
    ///
    /// # Panics
    ///
    /// Panics if the recording lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// The most recent token pair handed to the mock
    ///
    /// # Panics
    ///
    /// Panics if the recording lock is poisoned.
    #[must_use]
    pub fn last_tokens(&self) -> Option<TokenPair> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SessionEstablisher for MockSessionEstablisher {
    async fn establish_session(&self, tokens: &TokenPair) -> Result<AuthSession, AuthError> {
        self.seen.lock().unwrap().push(tokens.clone());
        match &self.behavior {
            MockBehavior::Succeed(session) => Ok(session.clone()),
            MockBehavior::Fail(message) => Err(AuthError::Backend {
                status: 400,
                message: message.clone(),
            }),
        }
    }
}
