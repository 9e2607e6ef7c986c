//! Test fixtures shared by the library and CLI suites: an in-process
//! stand-in for the remote tracker API plus record factories and
//! temp-path helpers. Not intended for production use.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use jobtrack::config::ApiConfig;
use jobtrack::tracker::{
    ApplicationDraft, ApplicationRecord, SessionStore, StatusCountMap, TrackerClient,
};

pub const SESSION_COOKIE: &str = "session=test-session-token";
pub const USERNAME: &str = "casey";
pub const PASSWORD: &str = "hunter2";

/// In-memory tracker API, mirroring the wire behavior a client can
/// observe: case-insensitive status filter, id preserved on update,
/// FastAPI-style `{"detail": ...}` error bodies, cookie-guarded
/// endpoints.
#[derive(Default)]
pub struct FakeTracker {
    records: Mutex<Vec<ApplicationRecord>>,
    next_id: AtomicU64,
    require_auth: bool,
    reported_total: Option<u64>,
}

impl FakeTracker {
    pub fn open() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_auth() -> Arc<Self> {
        Arc::new(Self {
            require_auth: true,
            ..Self::default()
        })
    }

    /// Reports `total` from the statistics endpoint regardless of how
    /// many records are stored, so drift between the reported total and
    /// the per-status counts can be staged.
    pub fn with_reported_total(total: u64) -> Arc<Self> {
        Arc::new(Self {
            reported_total: Some(total),
            ..Self::default()
        })
    }

    pub fn seed(&self, records: Vec<ApplicationRecord>) {
        *self.records.lock().expect("records mutex poisoned") = records;
    }

    pub fn stored(&self) -> Vec<ApplicationRecord> {
        self.records.lock().expect("records mutex poisoned").clone()
    }

    fn assign_id(&self) -> String {
        let sequence = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("app-{sequence:06}")
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        if !self.require_auth {
            return true;
        }
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(|cookie| cookie.contains(SESSION_COOKIE))
            .unwrap_or(false)
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Not authenticated" })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Application not found" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<String>,
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn list_applications(
    State(state): State<Arc<FakeTracker>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let records = state.records.lock().expect("records mutex poisoned");
    let listed: Vec<ApplicationRecord> = match params.status {
        Some(status) => records
            .iter()
            .filter(|record| record.status.to_lowercase() == status.to_lowercase())
            .cloned()
            .collect(),
        None => records.clone(),
    };
    Json(listed).into_response()
}

async fn create_application(
    State(state): State<Arc<FakeTracker>>,
    headers: HeaderMap,
    Json(draft): Json<ApplicationDraft>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut records = state.records.lock().expect("records mutex poisoned");
    let id = match draft.id.clone().filter(|id| !id.is_empty()) {
        Some(id) => {
            if records.iter().any(|record| record.id == id) {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({ "detail": "Application already exists" })),
                )
                    .into_response();
            }
            id
        }
        None => state.assign_id(),
    };
    let record = ApplicationRecord {
        id,
        company: draft.company,
        position: draft.position,
        date_applied: draft.date_applied,
        status: draft.status,
        notes: draft.notes,
    };
    records.push(record.clone());
    Json(record).into_response()
}

async fn fetch_application(
    State(state): State<Arc<FakeTracker>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let records = state.records.lock().expect("records mutex poisoned");
    match records.iter().find(|record| record.id == id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_application(
    State(state): State<Arc<FakeTracker>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
    Json(draft): Json<ApplicationDraft>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut records = state.records.lock().expect("records mutex poisoned");
    match records.iter_mut().find(|record| record.id == id) {
        Some(record) => {
            // The stored id always wins, whatever the payload carries.
            *record = ApplicationRecord {
                id: id.clone(),
                company: draft.company,
                position: draft.position,
                date_applied: draft.date_applied,
                status: draft.status,
                notes: draft.notes,
            };
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_application(
    State(state): State<Arc<FakeTracker>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut records = state.records.lock().expect("records mutex poisoned");
    let before = records.len();
    records.retain(|record| record.id != id);
    if records.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Application deleted successfully" })).into_response()
}

async fn statistics(State(state): State<Arc<FakeTracker>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let records = state.records.lock().expect("records mutex poisoned");
    let mut status_counts = StatusCountMap::new();
    for record in records.iter() {
        *status_counts.entry(record.status.clone()).or_insert(0) += 1;
    }
    let total = state.reported_total.unwrap_or(records.len() as u64);
    Json(json!({
        "total_applications": total,
        "status_counts": status_counts,
    }))
    .into_response()
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.username != USERNAME || credentials.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid username or password" })),
        )
            .into_response();
    }
    let mut response = Json(json!({ "username": credentials.username })).into_response();
    let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}; Path=/; HttpOnly"))
        .expect("valid header");
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    response
}

async fn logout(State(state): State<Arc<FakeTracker>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "message": "Logged out" })).into_response()
}

async fn me(State(state): State<Arc<FakeTracker>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "username": USERNAME })).into_response()
}

fn tracker_router(state: Arc<FakeTracker>) -> Router {
    Router::new()
        .route(
            "/applications/",
            get(list_applications).post(create_application),
        )
        .route(
            "/applications/:id",
            get(fetch_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/statistics/", get(statistics))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(state)
}

/// Serves the fake on an ephemeral local port and returns its base URL.
pub async fn spawn_tracker(state: Arc<FakeTracker>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, tracker_router(state))
            .await
            .expect("serve test tracker");
    });
    format!("http://{addr}")
}

/// A collision-free path under the system temp directory.
pub fn temp_path(tag: &str, ext: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "jobtrack-test-{tag}-{}-{nanos}.{ext}",
        std::process::id()
    ))
}

pub fn temp_session_path(tag: &str) -> PathBuf {
    temp_path(tag, "session")
}

pub fn client_for(base_url: &str, session_path: &Path) -> TrackerClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    TrackerClient::new(&config, SessionStore::new(session_path)).expect("client builds")
}

pub fn record(id: &str, company: &str, status: &str) -> ApplicationRecord {
    ApplicationRecord {
        id: id.to_string(),
        company: company.to_string(),
        position: "Software Engineer".to_string(),
        date_applied: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        status: status.to_string(),
        notes: None,
    }
}

pub fn draft(company: &str, status: &str) -> ApplicationDraft {
    ApplicationDraft {
        id: None,
        company: company.to_string(),
        position: "Software Engineer".to_string(),
        date_applied: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        status: status.to_string(),
        notes: None,
    }
}
