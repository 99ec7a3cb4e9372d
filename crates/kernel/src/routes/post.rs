//! Post display route.
//!
//! Fetches a post from the backend, renders its block document and wraps it
//! in the post page template.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{debug, warn};

use crate::content::render_html;
use crate::error::AppError;
use crate::state::AppState;

use super::helpers::message_response;

/// Create the post router.
pub fn router() -> Router<AppState> {
    Router::new().route("/posts/{id}", get(view_post))
}

/// View a single post.
///
/// A missing post is a 404 page and a backend failure is a 502 page; neither
/// is an error response from the handler's point of view.
async fn view_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let post = match state.client().fetch_post(&id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return Ok(message_response(
                &state,
                StatusCode::NOT_FOUND,
                "Post not found",
                "The post you are looking for does not exist or has been removed.",
            ));
        }
        Err(e) => {
            warn!(post_id = %id, error = %e, "failed to fetch post");
            return Ok(message_response(
                &state,
                StatusCode::BAD_GATEWAY,
                "Post unavailable",
                "The post could not be loaded. Please try again later.",
            ));
        }
    };

    let document = post.document();
    let body = render_html(document.as_ref());
    debug!(post_id = %post.id, bytes = body.len(), "rendered post body");

    let html = state.theme().render_post_page(&post, &body)?;
    Ok(Html(html).into_response())
}
