use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moonstudio::clock::ManualClock;
use moonstudio::config::ClientOptions;
use moonstudio::error::Error;
use moonstudio::notify::{Notifier, Variant};
use moonstudio::Studio;

fn session_body() -> serde_json::Value {
    json!({
        "access_token": "test_access_token",
        "refresh_token": "test_refresh_token",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": {
            "id": "test_user_id",
            "email": "artist@example.com",
            "phone": null,
            "app_metadata": {},
            "user_metadata": {},
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }
    })
}

fn studio(uri: &str) -> Studio {
    let options = ClientOptions::default()
        .with_signup_retry_base_delay(Duration::from_secs(1))
        .with_redirect_url("https://moonproduction.in/");
    Studio::new_with_options(uri, "anon-key", options)
}

#[tokio::test]
async fn startup_resolves_to_anonymous_when_no_session_exists() {
    let mock_server = MockServer::start().await;
    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();

    let sessions = studio.sessions(notifier);
    let mut state = sessions.subscribe();

    let resolved = state
        .wait_for(|s| !s.is_loading)
        .await
        .expect("state resolves");
    assert!(resolved.user.is_none());
    assert!(resolved.session.is_none());
}

#[tokio::test]
async fn sign_in_success_notifies_and_authenticates() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, mut notifications) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    sessions
        .sign_in("artist@example.com", "password123")
        .await
        .unwrap();

    let toast = notifications.recv().await.unwrap();
    assert_eq!(toast.title, "Welcome Back!");
    assert_eq!(toast.variant, Variant::Default);

    let mut state = sessions.subscribe();
    let authed = state
        .wait_for(|s| s.is_authenticated())
        .await
        .expect("push arrives");
    assert_eq!(authed.user.as_ref().unwrap().id, "test_user_id");
}

#[tokio::test]
async fn sign_in_failure_notifies_with_provider_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid login credentials"))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, mut notifications) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    let err = sessions
        .sign_in("artist@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider(_)));

    let toast = notifications.recv().await.unwrap();
    assert_eq!(toast.title, "Sign In Failed");
    assert_eq!(toast.description, "Invalid login credentials");
    assert_eq!(toast.variant, Variant::Destructive);
}

#[tokio::test]
async fn sign_out_clears_state_through_the_push_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, mut notifications) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    sessions
        .sign_in("artist@example.com", "password123")
        .await
        .unwrap();
    let mut state = sessions.subscribe();
    state.wait_for(|s| s.is_authenticated()).await.unwrap();

    sessions.sign_out().await.unwrap();

    // The manager never clears its cell directly; anonymity arrives via
    // the provider's broadcast.
    let cleared = state
        .wait_for(|s| !s.is_authenticated() && !s.is_loading)
        .await
        .expect("push arrives");
    assert!(cleared.session.is_none());

    let titles: Vec<String> = {
        let mut titles = Vec::new();
        while let Ok(n) = notifications.try_recv() {
            titles.push(n.title);
        }
        titles
    };
    assert!(titles.contains(&"See You Soon!".to_string()));
}

#[tokio::test]
async fn token_refresh_updates_state_through_the_push_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    let mut rotated = session_body();
    rotated["access_token"] = json!("rotated_access_token");
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rotated))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    sessions
        .sign_in("artist@example.com", "password123")
        .await
        .unwrap();
    let mut state = sessions.subscribe();
    state.wait_for(|s| s.is_authenticated()).await.unwrap();

    studio.auth().refresh_session().await.unwrap();

    // The manager mirrors the rotation like any other provider push.
    let refreshed = state
        .wait_for(|s| {
            s.session
                .as_ref()
                .is_some_and(|session| session.access_token == "rotated_access_token")
        })
        .await
        .expect("refresh push arrives");
    assert!(refreshed.is_authenticated());
}

#[tokio::test]
async fn sign_up_retries_once_on_rate_limit_then_succeeds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(429).set_body_string("email rate limit exceeded"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let clock = Arc::new(ManualClock::new());
    let sessions = studio.sessions_with_clock(notifier, clock.clone());

    sessions
        .sign_up("artist@example.com", "password123", "Test Artist", "+919876543210")
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "one failed call plus one successful retry");
    assert_eq!(clock.slept(), vec![Duration::from_secs(1)]);
}

#[tokio::test]
async fn sign_up_exhausted_retries_normalize_to_too_many_attempts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(429).set_body_string("email rate limit exceeded"))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let clock = Arc::new(ManualClock::new());
    let sessions = studio.sessions_with_clock(notifier, clock.clone());

    let err = sessions
        .sign_up("artist@example.com", "password123", "Test Artist", "+919876543210")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TooManyAttempts));
    let message = err.to_string().to_lowercase();
    assert!(message.contains("too many"));
    assert!(!message.contains("rate limit exceeded"), "raw provider string must not surface");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "first attempt plus two retries");
    // Linear backoff schedule: base, then base * 2.
    assert_eq!(
        clock.slept(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn sign_up_duplicate_account_passes_through_without_retry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_string("User already registered"))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    let err = sessions
        .sign_up("artist@example.com", "password123", "Test Artist", "+919876543210")
        .await
        .unwrap_err();

    match err {
        Error::Provider(provider_err) => {
            assert!(provider_err.is_duplicate_account());
            assert_eq!(provider_err.to_string(), "User already registered");
        }
        other => panic!("expected pass-through provider error, got {other:?}"),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "permanent errors are not retried");
}

#[tokio::test]
async fn pushes_after_shutdown_mutate_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    let mut state = sessions.subscribe();
    state.wait_for(|s| !s.is_loading).await.unwrap();
    assert!(!state.borrow().is_authenticated());

    sessions.shutdown();
    tokio::task::yield_now().await;

    // A provider push after teardown goes nowhere.
    studio
        .auth()
        .sign_in_with_password("artist@example.com", "password123")
        .await
        .unwrap();
    tokio::task::yield_now().await;

    assert!(!sessions.current().is_authenticated());
}

#[tokio::test]
async fn google_sign_in_builds_federated_redirect() {
    let mock_server = MockServer::start().await;
    let studio = studio(&mock_server.uri());
    let (notifier, _rx) = Notifier::channel();
    let sessions = studio.sessions(notifier);

    let url = sessions.sign_in_with_google();
    assert!(url.contains("/auth/v1/authorize?provider=google"));
    assert!(url.contains("redirect_to="));
}
