#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP route tests against a stub backend.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use agora_test_utils::assert;
use agora_test_utils::documents::{block, document, sample_document};
use agora_test_utils::test_post;

use common::{
    BROKEN_POST_ID, StubBackend, TestApp, UNREACHABLE_BACKEND, body_json, body_string,
};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_view_post_renders_page() {
    let post = test_post(1, "Welcome <Week>")
        .with_category("student-life")
        .with_featured_image("https://cdn.example.edu/hero.jpg")
        .with_stats(120, 7)
        .with_content(sample_document());
    let backend = StubBackend::new(vec![("1", post.response())]);
    let app = TestApp::new(&backend.spawn().await);

    let response = app.get("/posts/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    assert::contains(&html, "Welcome &lt;Week&gt;");
    assert::not_contains(&html, "Welcome <Week>");
    assert::contains(&html, "Student Life");
    assert::contains(&html, "October 17, 2026 14:30");
    assert::contains(&html, "120 views");
    // Tera escapes '/' in attribute values as well
    assert::contains(&html, "cdn.example.edu&#x2F;hero.jpg");
    assert::contains(&html, "<div class=\"prose prose-lg max-w-none\">");
    assert::contains(&html, "Classes start on <b>Monday</b>.");
    assert::in_order(&html, "Welcome Week", "Bring your student ID.");
}

#[tokio::test]
async fn test_view_post_unwraps_data_envelope() {
    let post = test_post(2, "Enveloped").with_content(document(vec![block(
        "paragraph",
        json!({ "text": "inside" }),
    )]));
    let backend = StubBackend::new(vec![("2", post.enveloped_response())]);
    let app = TestApp::new(&backend.spawn().await);

    let response = app.get("/posts/2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert::contains(&html, "Enveloped");
    assert::contains(&html, "inside");
}

#[tokio::test]
async fn test_view_post_with_string_content() {
    let doc = document(vec![block("delimiter", json!({}))]);
    let post = test_post(3, "Encoded").with_string_content(&doc);
    let backend = StubBackend::new(vec![("3", post.response())]);
    let app = TestApp::new(&backend.spawn().await);

    let html = body_string(app.get("/posts/3").await).await;
    assert::contains(&html, "<hr class=\"my-6 border-t-2 border-gray-300\">");
}

#[tokio::test]
async fn test_view_post_without_content_shows_placeholder() {
    let post = test_post(4, "Empty").with_content(json!(null));
    let backend = StubBackend::new(vec![("4", post.response())]);
    let app = TestApp::new(&backend.spawn().await);

    let response = app.get("/posts/4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert::contains(&body_string(response).await, "Content unavailable.");
}

#[tokio::test]
async fn test_view_missing_post_is_404_page() {
    let backend = StubBackend::new(vec![]);
    let app = TestApp::new(&backend.spawn().await);

    let response = app.get("/posts/404").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_string(response).await;
    assert::contains(&html, "Post not found");
    assert::contains(&html, "<!DOCTYPE html>");
}

#[tokio::test]
async fn test_backend_error_is_502_page() {
    let backend = StubBackend::new(vec![]);
    let app = TestApp::new(&backend.spawn().await);

    let response = app.get(&format!("/posts/{BROKEN_POST_ID}")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert::contains(&body_string(response).await, "Post unavailable");
}

#[tokio::test]
async fn test_unreachable_backend_is_502_page() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let response = app.get("/posts/1").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_render_api_placeholder_for_empty_object() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let response = app.post_json("/api/render", &json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["blocks"], 1);
    assert::contains(body["html"].as_str().unwrap(), "Content unavailable.");
}

#[tokio::test]
async fn test_render_api_counts_blocks() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let response = app.post_json("/api/render", &sample_document()).await;
    let body = body_json(response).await;
    assert_eq!(body["blocks"], 9);
    assert::contains(body["html"].as_str().unwrap(), "data-block=\"8\"");
}

#[tokio::test]
async fn test_render_api_rejects_invalid_json() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let response = app
        .request(
            axum::http::Request::post("/api/render")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{ not json"))
                .unwrap(),
        )
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_validate_api() {
    let app = TestApp::new(UNREACHABLE_BACKEND);

    let body = body_json(app.post_json("/api/validate", &sample_document()).await).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["issues"], json!([]));

    let doc = document(vec![
        block("paragraph", json!({ "text": "ok" })),
        block("carousel", json!({})),
    ]);
    let body = body_json(app.post_json("/api/validate", &doc).await).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["issues"][0]["index"], 1);
    assert_eq!(body["issues"][0]["block_type"], "carousel");

    let response = app.post_json("/api/validate", &json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_post_forwards_pending_sanitized_draft() {
    let backend = StubBackend::new(vec![]);
    let app = TestApp::with_token(&backend.spawn().await, Some("writer-token"));

    let request = json!({
        "writer_id": 12,
        "title": "Club fair",
        "excerpt": "All clubs in one place",
        "category": "clubs",
        "content": {
            "blocks": [
                {
                    "id": "p1",
                    "type": "paragraph",
                    "data": { "text": "<b>Join</b><script>steal()</script>" }
                },
                {
                    "id": "t1",
                    "type": "table",
                    "data": { "withHeadings": true, "content": [["Booth", "Time"]] }
                }
            ]
        },
    });
    let response = app.post_json("/api/posts", &request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["post"]["id"], 99);

    let received = backend.submissions();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].authorization.as_deref(), Some("Bearer writer-token"));

    let body = &received[0].body;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["writer_id"], 12);
    assert_eq!(body["category"], "clubs");
    assert_eq!(body["featured_image"], "");
    assert_eq!(body["content"]["blocks"][0]["data"]["text"], "<b>Join</b>");
    assert_eq!(body["content"]["blocks"][0]["id"], "p1");
    assert_eq!(body["content"]["blocks"][1]["data"]["withHeadings"], true);
}

#[tokio::test]
async fn test_submit_post_without_blocks_is_rejected() {
    let backend = StubBackend::new(vec![]);
    let app = TestApp::new(&backend.spawn().await);

    let request = json!({
        "writer_id": 1,
        "title": "Empty",
        "excerpt": "Nothing here",
        "content": { "blocks": [] },
    });
    let response = app.post_json("/api/posts", &request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert::contains(&body_string(response).await, "content");
    assert!(backend.submissions().is_empty());
}

#[tokio::test]
async fn test_submit_post_backend_down_is_502() {
    let app = TestApp::new(UNREACHABLE_BACKEND);
    let request = json!({
        "writer_id": 1,
        "title": "T",
        "excerpt": "E",
        "content": document(vec![block("delimiter", json!({}))]),
    });
    let response = app.post_json("/api/posts", &request).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
