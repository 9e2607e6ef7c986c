use jobtrack_test_helpers::{
    client_for, draft, record, spawn_tracker, temp_session_path, FakeTracker,
};

use jobtrack::config::ApiConfig;
use jobtrack::tracker::applications::client::{ApiError, TrackerClient};
use jobtrack::tracker::applications::session::SessionStore;

#[tokio::test]
async fn lists_applications_in_api_order() {
    let state = FakeTracker::open();
    state.seed(vec![
        record("app-1", "Acme", "Applied"),
        record("app-2", "Globex", "Hired"),
    ]);
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("list"));

    let records = client.list(None).await.expect("list succeeds");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "app-1");
    assert_eq!(records[1].company, "Globex");
}

#[tokio::test]
async fn status_filter_is_case_insensitive() {
    let state = FakeTracker::open();
    state.seed(vec![
        record("app-1", "Acme", "Applied"),
        record("app-2", "Globex", "Hired"),
        record("app-3", "Initech", "applied"),
    ]);
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("filter"));

    let records = client.list(Some("APPLIED")).await.expect("list succeeds");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.status.eq_ignore_ascii_case("applied")));
}

#[tokio::test]
async fn create_receives_a_server_assigned_id() {
    let state = FakeTracker::open();
    let base_url = spawn_tracker(state.clone()).await;
    let client = client_for(&base_url, &temp_session_path("create"));

    let created = client
        .create(&draft("Acme", "Applied"))
        .await
        .expect("create succeeds");
    assert_eq!(created.id, "app-000001");
    assert_eq!(created.company, "Acme");
    assert_eq!(state.stored().len(), 1);
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_the_stored_id() {
    let state = FakeTracker::open();
    state.seed(vec![record("app-7", "Acme", "Applied")]);
    let base_url = spawn_tracker(state.clone()).await;
    let client = client_for(&base_url, &temp_session_path("update"));

    let mut resubmission = state.stored()[0].to_draft();
    resubmission.status = "Offered".to_string();
    resubmission.id = Some("smuggled-id".to_string());

    let updated = client
        .update("app-7", &resubmission)
        .await
        .expect("update succeeds");
    assert_eq!(updated.id, "app-7");
    assert_eq!(updated.status, "Offered");
    assert_eq!(state.stored()[0].status, "Offered");
}

#[tokio::test]
async fn delete_removes_the_record() {
    let state = FakeTracker::open();
    state.seed(vec![record("app-9", "Acme", "Applied")]);
    let base_url = spawn_tracker(state.clone()).await;
    let client = client_for(&base_url, &temp_session_path("delete"));

    client.delete("app-9").await.expect("delete succeeds");
    assert!(state.stored().is_empty());

    let err = client.fetch("app-9").await.expect_err("record is gone");
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn missing_records_map_to_not_found() {
    let state = FakeTracker::open();
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("missing"));

    assert!(matches!(
        client.fetch("nope").await.expect_err("nothing stored"),
        ApiError::NotFound
    ));
    assert!(matches!(
        client.delete("nope").await.expect_err("nothing stored"),
        ApiError::NotFound
    ));
}

#[tokio::test]
async fn conflicting_create_surfaces_the_api_detail() {
    let state = FakeTracker::open();
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("conflict"));

    let mut pinned = draft("Acme", "Applied");
    pinned.id = Some("app-dup".to_string());
    client.create(&pinned).await.expect("first create succeeds");

    let err = client.create(&pinned).await.expect_err("duplicate id");
    match err {
        ApiError::Api { status, detail } => {
            assert_eq!(status.as_u16(), 409);
            assert_eq!(detail, "Application already exists");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn statistics_returns_raw_status_counts() {
    let state = FakeTracker::open();
    state.seed(vec![
        record("app-1", "Acme", "Applied"),
        record("app-2", "Globex", "Applied"),
        record("app-3", "Initech", "Phone Screening"),
        record("app-4", "Umbrella", "Ghosted"),
    ]);
    let base_url = spawn_tracker(state).await;
    let client = client_for(&base_url, &temp_session_path("stats"));

    let snapshot = client.statistics().await.expect("statistics succeed");
    assert_eq!(snapshot.total_applications, 4);
    assert_eq!(snapshot.status_counts.get("Applied"), Some(&2));
    assert_eq!(snapshot.status_counts.get("Phone Screening"), Some(&1));
    assert_eq!(snapshot.status_counts.get("Ghosted"), Some(&1));
}

#[test]
fn rejects_a_base_url_without_a_scheme() {
    let config = ApiConfig {
        base_url: "localhost:8000".to_string(),
        timeout_secs: 5,
    };
    let err = TrackerClient::new(&config, SessionStore::new(temp_session_path("bad-url")))
        .expect_err("scheme-less URL is not usable");
    assert!(matches!(err, ApiError::BaseUrl(_)));
}

#[test]
fn rejects_an_unparseable_base_url() {
    let config = ApiConfig {
        base_url: "not a url at all".to_string(),
        timeout_secs: 5,
    };
    let err = TrackerClient::new(&config, SessionStore::new(temp_session_path("unparseable")))
        .expect_err("garbage URL is not usable");
    assert!(matches!(err, ApiError::BaseUrl(_)));
}
