//! Persistence boundary of the goal editor.
//!
//! [`GoalApiTrait`] is what the sync layer writes through. [`HttpGoalApi`]
//! talks to the Goalsaver server; tests plug in their own implementations.

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use goalsaver_core::errors::{Error, Result, ValidationError};
use goalsaver_core::goals::Goal;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait GoalApiTrait: Send + Sync {
    async fn get_goals(&self) -> Result<Vec<Goal>>;

    /// Sends the full projection of `goal_id`. Returns the goal as stored.
    async fn update_goal(&self, goal_id: &str, goal: &Goal) -> Result<Goal>;
}

/// Error body returned by the server for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: Option<u16>,
    message: Option<String>,
}

/// Maps a non-2xx response to an error. The body's `code`, when it is a valid
/// status, takes precedence over the transport status.
fn error_from_response(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let status = parsed
        .as_ref()
        .and_then(|err| err.code)
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(status);
    let message = parsed
        .and_then(|err| err.message)
        .unwrap_or_else(|| {
            format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>())
        });

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ValidationError::InvalidInput(message).into()
        }
        _ => Error::Sync(format!("API error {}: {}", status, message)),
    }
}

/// Goals API client over HTTP.
pub struct HttpGoalApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGoalApi {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Sync(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Sync(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Sync(format!("Failed to parse response: {} - {}", e, body)))
    }
}

#[async_trait]
impl GoalApiTrait for HttpGoalApi {
    async fn get_goals(&self) -> Result<Vec<Goal>> {
        let url = self.url("/goals");
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Sync(format!("Request failed: {}", e)))?;
        self.parse_response(response).await
    }

    async fn update_goal(&self, goal_id: &str, goal: &Goal) -> Result<Goal> {
        let url = self.url(&format!("/goals/{}", goal_id));
        debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .json(goal)
            .send()
            .await
            .map_err(|e| Error::Sync(format!("Request failed: {}", e)))?;
        self.parse_response(response).await
    }
}
