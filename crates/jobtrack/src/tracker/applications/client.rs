use reqwest::{header, Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::ApiConfig;
use crate::tracker::stats::StatusCountMap;

use super::domain::{ApplicationDraft, ApplicationRecord};
use super::session::{SessionError, SessionStore};

/// Payload returned by `GET /statistics/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_applications: u64,
    pub status_counts: StatusCountMap,
}

/// Identity payload returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionIdentity {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    fn detail_text(self) -> String {
        match self.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid tracker API base URL '{0}'")]
    BaseUrl(String),
    #[error("not authenticated with the tracker API")]
    Unauthorized,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("application not found")]
    NotFound,
    #[error("tracker API returned {status}: {detail}")]
    Api { status: StatusCode, detail: String },
    #[error("request to the tracker API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Typed client for the remote tracker API.
///
/// Wraps the CRUD and statistics endpoints and carries the session
/// cookie on every request. Error statuses are mapped before decoding:
/// `401` means the session is missing or expired, `404` means the
/// record does not exist, anything else surfaces the API's `detail`
/// message.
#[derive(Debug)]
pub struct TrackerClient {
    http: Client,
    base_url: Url,
    session: SessionStore,
}

impl TrackerClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|_| ApiError::BaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(config.base_url.clone()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<ApplicationRecord>, ApiError> {
        let mut url = self.endpoint("applications/")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status);
        }
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn fetch(&self, id: &str) -> Result<ApplicationRecord, ApiError> {
        let url = self.endpoint(&format!("applications/{id}"))?;
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn create(&self, draft: &ApplicationDraft) -> Result<ApplicationRecord, ApiError> {
        let url = self.endpoint("applications/")?;
        let response = self.send(self.http.post(url).json(draft)).await?;
        Ok(response.json().await?)
    }

    /// Replaces the stored record wholesale; the API has no partial update.
    pub async fn update(
        &self,
        id: &str,
        draft: &ApplicationDraft,
    ) -> Result<ApplicationRecord, ApiError> {
        let url = self.endpoint(&format!("applications/{id}"))?;
        let response = self.send(self.http.put(url).json(draft)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("applications/{id}"))?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    pub async fn statistics(&self) -> Result<StatisticsSnapshot, ApiError> {
        let url = self.endpoint("statistics/")?;
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Exchanges credentials for a session cookie and persists it.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint("login")?;
        let payload = json!({ "username": username, "password": password });
        let response = match self.send(self.http.post(url).json(&payload)).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(ApiError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        let cookie = session_cookie(&response).ok_or(SessionError::MissingSessionCookie)?;
        self.session.save(&cookie)?;
        Ok(())
    }

    /// Ends the server-side session and discards the stored cookie. An
    /// already-expired session still clears the local state.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint("logout")?;
        match self.send(self.http.post(url)).await {
            Ok(_) | Err(ApiError::Unauthorized) => {}
            Err(err) => return Err(err),
        }
        self.session.clear()?;
        Ok(())
    }

    pub async fn whoami(&self) -> Result<SessionIdentity, ApiError> {
        let url = self.endpoint("me")?;
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.session.load()? {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        };

        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "tracker API response");

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if status.is_success() => Ok(response),
            status => Err(ApiError::Api {
                status,
                detail: error_detail(response).await,
            }),
        }
    }
}

fn session_cookie(response: &reqwest::Response) -> Option<String> {
    let mut fallback = None;
    for value in response.headers().get_all(header::SET_COOKIE) {
        let raw = match value.to_str() {
            Ok(raw) => raw,
            Err(_) => continue,
        };
        let pair = raw.split(';').next().unwrap_or(raw).trim();
        if !pair.contains('=') {
            continue;
        }
        // Prefer the cookie actually named "session"; fall back to the
        // first pair the server sets.
        if pair.starts_with("session=") {
            return Some(pair.to_string());
        }
        if fallback.is_none() {
            fallback = Some(pair.to_string());
        }
    }
    fallback
}

async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.is_empty() => match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.detail_text(),
            Err(_) => body,
        },
        _ => status
            .canonical_reason()
            .unwrap_or("no error detail")
            .to_string(),
    }
}
