//! Unified testing utilities
//!
//! Consolidates test fixtures and mock collaborators used by unit tests and
//! by integration tests (behind the `testing` feature).
//!
//! - [`fixtures`] - Pre-built test data (settings, sessions, callback URLs)
//! - [`mock`] - Mock session establisher for driving the deep-link handler

pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use mock::MockSessionEstablisher;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test user id
    pub const TEST_USER_ID: &str = "user-123";

    /// Default test access token value
    pub const TEST_ACCESS_TOKEN: &str = "test_access_token";

    /// Default test refresh token value
    pub const TEST_REFRESH_TOKEN: &str = "test_refresh_token";
}
