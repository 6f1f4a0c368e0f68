use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const TEAMS: &str = "/teams";
pub const MATCHES: &str = "/matches";
pub const PLAYERS: &str = "/players";

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client, ApiError> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Transport)
    })
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Base addresses for the REST surface and the push channel.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub ws_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("MATCHDAY_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:8000/api".to_string())
            .trim_end_matches('/')
            .to_string();
        let ws_url = std::env::var("MATCHDAY_WS_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "ws://127.0.0.1:8000/ws".to_string());
        Self { base_url, ws_url }
    }
}

/// Thin CRUD wrapper over the backend resource endpoints. All verbs funnel
/// through one request path that sets the JSON content type and converts
/// non-success statuses into a typed failure. Notification of failures is the
/// manager boundary's job, not this layer's.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ApiError> {
        // Cache-defeating marker so repeated reads bypass intermediate caches.
        let url = format!(
            "{}{}?reload={}",
            self.base_url,
            endpoint,
            cache_bust_marker()
        );
        let resp = self.send(http_client()?.get(url))?;
        Ok(resp.json()?)
    }

    pub fn get_one<T: DeserializeOwned>(&self, endpoint: &str, id: i64) -> Result<T, ApiError> {
        let url = format!("{}{}/{}", self.base_url, endpoint, id);
        let resp = self.send(http_client()?.get(url))?;
        Ok(resp.json()?)
    }

    pub fn create<T: Serialize + ?Sized>(&self, endpoint: &str, payload: &T) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.send(http_client()?.post(url).json(payload))?;
        Ok(())
    }

    pub fn update<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        id: i64,
        payload: &T,
    ) -> Result<(), ApiError> {
        let url = format!("{}{}/{}", self.base_url, endpoint, id);
        self.send(http_client()?.put(url).json(payload))?;
        Ok(())
    }

    pub fn remove(&self, endpoint: &str, id: i64) -> Result<(), ApiError> {
        let url = format!("{}{}/{}", self.base_url, endpoint, id);
        self.send(http_client()?.delete(url))?;
        Ok(())
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.header(CONTENT_TYPE, "application/json").send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

fn cache_bust_marker() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
