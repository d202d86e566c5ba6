#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the bastion-auth crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auth;
pub mod deeplink;
pub mod models;
pub mod redirect;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use auth::{AuthClient, AuthError, SessionEstablisher};
pub use deeplink::{DeepLinkHandler, RedirectOutcome};
pub use models::{AuthSession, AuthUser, TokenPair};
pub use redirect::extract_token_pair;
pub use settings::BastionAuthSettings;
