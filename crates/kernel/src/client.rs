//! HTTP client for the portal backend REST API.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::content::PostSubmission;
use crate::models::Post;

/// Errors talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("backend URL cannot carry a path: {0}")]
    NotABase(String),

    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected backend response: {0}")]
    Decode(String),
}

/// Client for the backend's post endpoints.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl PortalClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// No retries are attempted; every request is bounded by `timeout`.
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::NotABase(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Agora/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            config.api_timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a post by id. A backend 404 is `Ok(None)`.
    pub async fn fetch_post(&self, id: &str) -> Result<Option<Post>, ClientError> {
        let url = self.endpoint(&["posts", id])?;
        debug!(%url, "fetching post");

        let response = self
            .authorize(self.client.get(url))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(post_id = id, "post not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let body: Value = response.json().await?;
        extract_post(body)
    }

    /// Submit a post for review. Returns the backend's response body.
    pub async fn submit_post(&self, submission: &PostSubmission) -> Result<Value, ClientError> {
        let url = self.endpoint(&["writer", "posts"])?;
        debug!(%url, title = %submission.title, "submitting post");

        let response = self
            .authorize(self.client.post(url))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        // Some backends answer 201/204 with no body
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::NotABase(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Unwrap an optional `data` envelope, then the `post` field.
///
/// A body without a `post` field is taken to be the post itself.
fn extract_post(body: Value) -> Result<Option<Post>, ClientError> {
    let body = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    let post = match body {
        Value::Object(mut map) if map.contains_key("post") => {
            map.remove("post").unwrap_or(Value::Null)
        }
        other => other,
    };

    if post.is_null() {
        return Ok(None);
    }

    serde_json::from_value(post)
        .map(Some)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Build an error from a non-success response, preferring the backend's
/// `message` field over the raw body.
async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            let mut end = body.len().min(200);
            while end > 0 && !body.is_char_boundary(end) {
                end -= 1;
            }
            let snippet = body[..end].trim();
            if snippet.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                snippet.to_string()
            }
        });

    warn!(status = status.as_u16(), %message, "backend request failed");
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}
