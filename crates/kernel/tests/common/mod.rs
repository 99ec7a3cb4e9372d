#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the real router through `tower::ServiceExt::oneshot`. The
//! backend is a small axum stub bound to an ephemeral local port, so the
//! real `PortalClient` is exercised over HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use agora_kernel::client::PortalClient;
use agora_kernel::routes;
use agora_kernel::state::AppState;
use agora_kernel::theme::ThemeEngine;

/// Post id the stub backend answers with a 500.
pub const BROKEN_POST_ID: &str = "broken";

/// Base URL nothing listens on.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9/api";

/// Test application wrapping the real router.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Create an app talking to the backend at `backend_url`.
    pub fn new(backend_url: &str) -> Self {
        Self::with_token(backend_url, None)
    }

    /// Create an app that sends a bearer token to the backend.
    pub fn with_token(backend_url: &str, token: Option<&str>) -> Self {
        let client = PortalClient::new(
            backend_url,
            token.map(str::to_string),
            Duration::from_secs(2),
        )
        .expect("Failed to create backend client");
        let theme = ThemeEngine::with_defaults().expect("Failed to load templates");
        let state = AppState::from_parts(client, theme);
        Self {
            router: routes::router(state),
        }
    }

    /// Send a request to the app.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Collect a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A submission received by the stub backend.
#[derive(Debug, Clone)]
pub struct ReceivedSubmission {
    pub authorization: Option<String>,
    pub body: Value,
}

/// In-memory stand-in for the portal backend.
#[derive(Clone, Default)]
pub struct StubBackend {
    /// `GET /posts/{id}` response bodies, keyed by id.
    posts: Arc<HashMap<String, Value>>,
    submissions: Arc<Mutex<Vec<ReceivedSubmission>>>,
}

impl StubBackend {
    pub fn new(posts: Vec<(&str, Value)>) -> Self {
        Self {
            posts: Arc::new(
                posts
                    .into_iter()
                    .map(|(id, body)| (id.to_string(), body))
                    .collect(),
            ),
            submissions: Arc::default(),
        }
    }

    pub fn submissions(&self) -> Vec<ReceivedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port; returns the API base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/posts/{id}", get(stub_get_post))
            .route("/api/writer/posts", post(stub_create_post))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }
}

async fn stub_get_post(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    if id == BROKEN_POST_ID {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server Error" })),
        )
            .into_response();
    }
    match stub.posts.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Post not found" })),
        )
            .into_response(),
    }
}

async fn stub_create_post(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.submissions.lock().unwrap().push(ReceivedSubmission {
        authorization,
        body: body.clone(),
    });
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Post submitted for review", "post": { "id": 99 } })),
    )
        .into_response()
}
