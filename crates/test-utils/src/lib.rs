//! Agora test utilities.
//!
//! Helpers for integration testing: backend post fixtures, block document
//! builders, and assertion utilities for rendered output.

use serde_json::{Value as JsonValue, json};

/// Create a test post with default values.
pub fn test_post(id: i64, title: &str) -> TestPost {
    TestPost {
        id,
        title: title.to_string(),
        excerpt: format!("Excerpt for {title}"),
        category: "news".to_string(),
        featured_image: None,
        post_day: Some("2026-10-17 14:30:00".to_string()),
        views: 0,
        likes: 0,
        content: documents::document(vec![]),
    }
}

/// A backend post builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestPost {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub featured_image: Option<String>,
    pub post_day: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub content: JsonValue,
}

impl TestPost {
    /// Set the category slug.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Set the featured image URL.
    pub fn with_featured_image(mut self, url: &str) -> Self {
        self.featured_image = Some(url.to_string());
        self
    }

    /// Set view and like counters.
    pub fn with_stats(mut self, views: u64, likes: u64) -> Self {
        self.views = views;
        self.likes = likes;
        self
    }

    /// Set the stored document.
    pub fn with_content(mut self, content: JsonValue) -> Self {
        self.content = content;
        self
    }

    /// Store the document JSON-encoded as a string.
    pub fn with_string_content(mut self, content: &JsonValue) -> Self {
        self.content = JsonValue::String(content.to_string());
        self
    }

    /// The post as the backend serializes it.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "title": self.title,
            "excerpt": self.excerpt,
            "category": self.category,
            "featured_image": self.featured_image,
            "post_day": self.post_day,
            "views": self.views,
            "likes": self.likes,
            "content": self.content,
        })
    }

    /// `GET /posts/{id}` response body: `{ "post": ... }`.
    pub fn response(&self) -> JsonValue {
        json!({ "post": self.to_json() })
    }

    /// Response body wrapped in a `data` envelope.
    pub fn enveloped_response(&self) -> JsonValue {
        json!({ "data": self.response() })
    }
}

/// Block document builders.
pub mod documents {
    use serde_json::{Value, json};

    /// A single wire block.
    pub fn block(block_type: &str, data: Value) -> Value {
        json!({ "type": block_type, "data": data })
    }

    /// A document holding the given blocks.
    pub fn document(blocks: Vec<Value>) -> Value {
        json!({ "time": 1_760_000_000_000_i64, "blocks": blocks, "version": "2.28.2" })
    }

    /// One block of each of the nine known types, in a fixed order:
    /// header, paragraph, list, quote, code, delimiter, image, table, warning.
    pub fn sample_document() -> Value {
        document(vec![
            block("header", json!({ "text": "Welcome Week", "level": 2 })),
            block(
                "paragraph",
                json!({ "text": "Classes start on <b>Monday</b>." }),
            ),
            block(
                "list",
                json!({ "style": "ordered", "items": ["Register", "Collect ID card"] }),
            ),
            block(
                "quote",
                json!({ "text": "Knowledge is power.", "caption": "Francis Bacon" }),
            ),
            block(
                "code",
                json!({ "code": "<b>not bold</b>", "language": null }),
            ),
            block("delimiter", json!({})),
            block(
                "image",
                json!({ "file": { "url": "https://cdn.example.edu/campus.jpg" }, "caption": "Main campus" }),
            ),
            block(
                "table",
                json!({ "content": [["Day", "Event"], ["Mon", "Orientation"]] }),
            ),
            block(
                "warning",
                json!({ "title": "Note", "message": "Bring your student ID." }),
            ),
        ])
    }
}

/// Assertion helpers for rendered output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `first` occurs before `second` in `haystack`.
    pub fn in_order(haystack: &str, first: &str, second: &str) {
        let a = haystack.find(first);
        let b = haystack.find(second);
        assert!(
            matches!((a, b), (Some(a), Some(b)) if a < b),
            "Expected '{first}' before '{second}'\nActual: {haystack}"
        );
    }
}
