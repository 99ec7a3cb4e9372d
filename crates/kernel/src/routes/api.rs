//! JSON API: render preview, advisory validation and post submission.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use agora_sdk::document::Document;

use crate::content::{BlockIssue, PostDraft, nodes_to_html, render_value};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/render", post(render_preview))
        .route("/api/validate", post(validate_document))
        .route("/api/posts", post(submit_post))
}

/// Rendered preview of a document.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
    /// Number of rendered nodes.
    pub blocks: usize,
}

/// Render any JSON value as a document.
///
/// Anything without a `blocks` sequence yields the placeholder; this never
/// fails once the body parses as JSON.
async fn render_preview(Json(document): Json<Value>) -> Json<RenderResponse> {
    let nodes = render_value(Some(&document));
    Json(RenderResponse {
        html: nodes_to_html(&nodes),
        blocks: nodes.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub issues: Vec<BlockIssue>,
}

/// Check a document against the standard block definitions.
async fn validate_document(
    State(state): State<AppState>,
    Json(value): Json<Value>,
) -> AppResult<Json<ValidateResponse>> {
    let document = Document::from_value(&value)
        .ok_or_else(|| AppError::BadRequest("document has no blocks array".to_string()))?;

    let issues = state.block_types().validate_document(&document);
    Ok(Json(ValidateResponse {
        valid: issues.is_empty(),
        issues,
    }))
}

/// Writer form payload.
#[derive(Debug, Deserialize)]
pub struct SubmitPostRequest {
    pub writer_id: u64,
    #[serde(flatten)]
    pub draft: PostDraft,
}

/// Validate, sanitize and forward a draft to the backend as a pending post.
async fn submit_post(
    State(state): State<AppState>,
    Json(request): Json<SubmitPostRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let submission = request.draft.into_submission(request.writer_id)?;
    let response = state.client().submit_post(&submission).await?;
    info!(writer_id = request.writer_id, "post submitted for review");
    Ok((StatusCode::CREATED, Json(response)))
}
