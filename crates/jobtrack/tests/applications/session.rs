use jobtrack_test_helpers::{
    client_for, record, spawn_tracker, temp_session_path, FakeTracker, PASSWORD, SESSION_COOKIE,
    USERNAME,
};

use jobtrack::tracker::applications::client::ApiError;
use jobtrack::tracker::applications::session::SessionStore;

#[test]
fn missing_session_file_means_no_session() {
    let store = SessionStore::new(temp_session_path("absent"));
    assert!(store.load().expect("missing file is not an error").is_none());
}

#[test]
fn save_load_clear_round_trip() {
    let store = SessionStore::new(temp_session_path("round-trip"));
    store.save("session=abc123").expect("save succeeds");
    assert_eq!(
        store.load().expect("load succeeds").as_deref(),
        Some("session=abc123")
    );
    store.clear().expect("clear succeeds");
    assert!(store.load().expect("load succeeds").is_none());
    store.clear().expect("clearing twice is fine");
}

#[tokio::test]
async fn unauthenticated_calls_surface_unauthorized() {
    let state = FakeTracker::with_auth();
    state.seed(vec![record("app-1", "Acme", "Applied")]);
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("unauthenticated"));

    let err = client.list(None).await.expect_err("no session yet");
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn login_persists_the_cookie_and_authenticates_later_calls() {
    let state = FakeTracker::with_auth();
    state.seed(vec![record("app-1", "Acme", "Applied")]);
    let base_url = spawn_tracker(state).await;
    let session_path = temp_session_path("login");
    let client = client_for(&base_url, &session_path);

    client.login(USERNAME, PASSWORD).await.expect("login succeeds");
    assert_eq!(
        client.session().load().expect("cookie stored").as_deref(),
        Some(SESSION_COOKIE)
    );

    let records = client.list(None).await.expect("session cookie rides along");
    assert_eq!(records.len(), 1);

    let identity = client.whoami().await.expect("identity available");
    assert_eq!(identity.username.as_deref(), Some(USERNAME));
}

#[tokio::test]
async fn bad_credentials_map_to_invalid_credentials() {
    let state = FakeTracker::with_auth();
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("bad-creds"));

    let err = client
        .login(USERNAME, "wrong")
        .await
        .expect_err("password is wrong");
    assert!(matches!(err, ApiError::InvalidCredentials));
    assert!(client.session().load().expect("no cookie").is_none());
}

#[tokio::test]
async fn logout_discards_the_stored_session() {
    let state = FakeTracker::with_auth();
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("logout"));

    client.login(USERNAME, PASSWORD).await.expect("login succeeds");
    client.logout().await.expect("logout succeeds");
    assert!(client.session().load().expect("cookie gone").is_none());

    let err = client.whoami().await.expect_err("session is gone");
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn logout_clears_locally_even_when_the_server_session_expired() {
    let state = FakeTracker::with_auth();
    let base_url = spawn_tracker(state).await;
    let session_path = temp_session_path("stale");
    let client = client_for(&base_url, &session_path);

    client
        .session()
        .save("session=expired-token")
        .expect("seed stale cookie");
    client.logout().await.expect("logout tolerates expiry");
    assert!(client.session().load().expect("cookie gone").is_none());
}
