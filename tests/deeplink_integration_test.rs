// Integration tests for the deep-link handler and auth client wiring,
// using the testing utilities (run with --features testing)
use bastion_auth::testing::{MockSessionEstablisher, TestFixtures};
use bastion_auth::{AuthClient, AuthError, DeepLinkHandler, RedirectOutcome};

#[tokio::test]
async fn fragment_callback_establishes_session_once() {
    let mock = MockSessionEstablisher::succeeding();
    let handler = DeepLinkHandler::new(mock.clone());

    let outcome = handler
        .handle_redirect(&TestFixtures::fragment_callback_url())
        .await
        .expect("callback should establish a session");

    match outcome {
        RedirectOutcome::SessionEstablished(session) => {
            assert_eq!(session.user.id, "user-123");
            assert!(!session.is_expired());
        }
        RedirectOutcome::NotCallback => panic!("expected established session"),
    }
    assert_eq!(mock.calls(), 1);

    let tokens = mock.last_tokens().unwrap();
    assert_eq!(tokens.access_token, "test_access_token");
    assert_eq!(tokens.refresh_token, "test_refresh_token");
}

#[tokio::test]
async fn query_callback_establishes_session() {
    let mock = MockSessionEstablisher::succeeding();
    let handler = DeepLinkHandler::new(mock.clone());

    let outcome = handler
        .handle_redirect(&TestFixtures::query_callback_url())
        .await
        .unwrap();
    assert!(matches!(outcome, RedirectOutcome::SessionEstablished(_)));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn cold_start_launch_url_is_silent() {
    let mock = MockSessionEstablisher::succeeding();
    let handler = DeepLinkHandler::new(mock.clone());

    let outcome = handler
        .handle_redirect(&TestFixtures::launch_url())
        .await
        .unwrap();
    assert!(matches!(outcome, RedirectOutcome::NotCallback));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn rejected_tokens_surface_backend_error() {
    let mock = MockSessionEstablisher::failing("Invalid Refresh Token");
    let handler = DeepLinkHandler::new(mock.clone());

    let err = handler
        .handle_redirect(&TestFixtures::fragment_callback_url())
        .await
        .unwrap_err();
    match err {
        AuthError::Backend { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid Refresh Token");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(mock.calls(), 1);
}

#[test]
fn client_builds_from_fixture_settings() {
    let client = AuthClient::from_settings(&TestFixtures::settings()).unwrap();
    assert_eq!(client.redirect_uri(), "bitbastion://auth-callback");

    let url = client.authorize_url("apple").unwrap();
    assert!(url.starts_with("https://test-project.supabase.co/auth/v1/authorize"));
    assert!(url.contains("provider=apple"));
}

#[test]
fn unconfigured_settings_are_rejected() {
    let settings = bastion_auth::BastionAuthSettings::default();
    assert!(matches!(
        AuthClient::from_settings(&settings),
        Err(AuthError::Configuration(_))
    ));
}
