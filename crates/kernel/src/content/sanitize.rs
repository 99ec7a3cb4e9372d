//! Markup sanitization: the upstream side of the trust boundary.
//!
//! The renderer writes `TrustedHtml` without escaping. Everything that
//! becomes `TrustedHtml` from editor input goes through here first, on the
//! authoring path, before the document is submitted for storage.
//!
//! Sanitization works on the wire `data` payload and rewrites only the
//! markup strings. Every other key, and every block-level key, is stored
//! exactly as the editor produced it.

use std::collections::HashSet;
use std::sync::LazyLock;

use agora_sdk::document::{BlockKind, Document, RawBlock};
use agora_sdk::markup::TrustedHtml;
use serde_json::Value;

/// Ammonia's default allowlist without the `rel` it adds to links.
static STRICT: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder.link_rel(None);
    builder
});

/// Same parser and serializer as [`STRICT`], keeping the tags, attributes
/// and URL schemes that [`STRICT`] drops. Only output that differs from
/// this pass has had something removed.
static NORMALIZE: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .link_rel(None)
        .clean_content_tags(HashSet::new())
        .add_tags(DROPPED_TAGS)
        .generic_attribute_prefixes(HashSet::from([""]))
        .add_url_schemes(["javascript", "vbscript", "data", "file"]);
    builder
});

const DROPPED_TAGS: [&str; 32] = [
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "param",
    "form", "input", "button", "textarea", "select", "option", "label", "fieldset", "link",
    "meta", "base", "title", "svg", "math", "noscript", "template", "marquee", "font",
    "center", "video", "audio", "source", "canvas",
];

/// Sanitize untrusted markup with ammonia's default allowlist.
///
/// Strips `<script>`, event handlers, `javascript:` URLs and similar XSS
/// vectors while keeping inline formatting (`<b>`, `<i>`, `<a>`, `<br>`, ...).
pub fn sanitize_markup(input: &str) -> TrustedHtml {
    TrustedHtml::assume_sanitized(ammonia::clean(input))
}

/// Whether sanitizing `input` would remove a tag, attribute or URL.
///
/// Serializer differences (entity escaping, attribute quoting, the `rel`
/// ammonia adds to links) do not count.
pub fn removes_markup(input: &str) -> bool {
    STRICT.clean(input).to_string() != NORMALIZE.clean(input).to_string()
}

/// Sanitize the markup fields of one wire block in place.
///
/// Paragraph and quote `text`, list items (nested lists included) and table
/// cells are cleaned. Code, header, warning and caption text is escaped at
/// render time and left alone, as is every unknown block.
pub fn sanitize_block(block: &mut RawBlock) {
    let Some(kind) = BlockKind::from_type_name(&block.block_type) else {
        return;
    };
    let data = &mut block.data;
    match kind {
        BlockKind::Paragraph | BlockKind::Quote => sanitize_value_field(data, "text"),
        BlockKind::List => sanitize_list_items(data),
        BlockKind::Table => {
            if let Some(rows) = data.get_mut("content").and_then(Value::as_array_mut) {
                for cell in rows
                    .iter_mut()
                    .filter_map(Value::as_array_mut)
                    .flatten()
                {
                    sanitize_string(cell);
                }
            }
        }
        BlockKind::Header
        | BlockKind::Code
        | BlockKind::Delimiter
        | BlockKind::Image
        | BlockKind::Warning => {}
    }
}

/// Sanitize every markup field of a document in place.
pub fn sanitize_document(document: &mut Document) {
    for block in document.blocks.iter_mut() {
        sanitize_block(block);
    }
}

/// Items are strings, or `{ "content", "items" }` objects from the nested
/// list tool.
fn sanitize_list_items(list: &mut Value) {
    let Some(items) = list.get_mut("items").and_then(Value::as_array_mut) else {
        return;
    };
    for item in items.iter_mut() {
        if item.is_string() {
            sanitize_string(item);
        } else if item.is_object() {
            sanitize_value_field(item, "content");
            sanitize_list_items(item);
        }
    }
}

fn sanitize_value_field(data: &mut Value, field: &str) {
    if let Some(value) = data.get_mut(field) {
        sanitize_string(value);
    }
}

fn sanitize_string(value: &mut Value) {
    if let Some(clean) = value.as_str().map(sanitize_markup) {
        *value = Value::String(clean.into_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(blocks: serde_json::Value) -> Document {
        Document::from_value(&json!({ "blocks": blocks })).unwrap()
    }

    #[test]
    fn sanitize_markup_strips_script() {
        let out = sanitize_markup("<p>Hello</p><script>alert('xss')</script>");
        assert!(!out.as_str().contains("<script>"));
        assert!(out.as_str().contains("<p>Hello</p>"));
    }

    #[test]
    fn sanitize_markup_preserves_safe_tags() {
        let input = "Hello <strong>world</strong> and <b>bold</b>";
        assert_eq!(sanitize_markup(input).as_str(), input);
    }

    #[test]
    fn sanitize_markup_strips_event_handlers() {
        let out = sanitize_markup(r#"<a href="/page" onclick="alert('xss')">Link</a>"#);
        assert!(!out.as_str().contains("onclick"));
        assert!(out.as_str().contains("Link"));
    }

    #[test]
    fn removes_markup_ignores_serializer_changes() {
        assert!(!removes_markup(r#"See <a href="https://u.edu">site</a>"#));
        assert!(!removes_markup("Q & A"));
        assert!(!removes_markup("a&nbsp;b<br/>c <i>d</i>"));
        assert!(!removes_markup("plain text"));
    }

    #[test]
    fn removes_markup_detects_removals() {
        assert!(removes_markup("<b>ok</b><script>x()</script>"));
        assert!(removes_markup(r#"<img src="x" onerror="y()">"#));
        assert!(removes_markup(r#"<a href="javascript:z()">q</a>"#));
        assert!(removes_markup(r#"<iframe src="https://evil.example"></iframe>"#));
    }

    #[test]
    fn sanitize_document_cleans_every_markup_field() {
        let mut document = doc(json!([
            { "type": "paragraph", "data": { "text": "<b>Hi</b><script>x</script>" } },
            { "type": "list", "data": { "style": "ordered", "items": ["ok", "<img src=x onerror=alert(1)>"] } },
            { "type": "quote", "data": { "text": "Q<script>y</script>", "caption": "Me" } },
            { "type": "table", "data": { "content": [["<b>A</b>", "<script>z</script>B"]] } }
        ]));
        sanitize_document(&mut document);

        let dumped = serde_json::to_string(&document).unwrap();
        assert!(!dumped.contains("<script>"));
        assert!(!dumped.contains("onerror"));
        assert_eq!(document.blocks[0].data["text"], "<b>Hi</b>");
        assert_eq!(document.blocks[1].data["style"], "ordered");
        assert_eq!(document.blocks[2].data["caption"], "Me");
        assert_eq!(document.blocks[3].data["content"][0][0], "<b>A</b>");
        assert_eq!(document.blocks[3].data["content"][0][1], "B");
    }

    #[test]
    fn sanitize_document_keeps_everything_but_markup() {
        let blocks = json!([
            { "id": "h1", "type": "header", "data": { "text": "T", "level": 7 } },
            { "id": "t1", "type": "table", "data": { "withHeadings": true, "content": [["A"]] } },
            {
                "id": "i1",
                "type": "image",
                "data": {
                    "file": { "url": "u", "width": 640 },
                    "caption": "c",
                    "stretched": true,
                    "withBorder": false
                }
            },
            {
                "id": "l1",
                "type": "list",
                "data": {
                    "style": "ordered",
                    "items": [{
                        "content": "a",
                        "meta": {},
                        "items": [{ "content": "nested", "items": [] }]
                    }]
                }
            }
        ]);
        let mut document = doc(blocks.clone());
        sanitize_document(&mut document);
        assert_eq!(serde_json::to_value(&document).unwrap()["blocks"], blocks);
    }

    #[test]
    fn sanitize_document_cleans_nested_list_items() {
        let mut document = doc(json!([{
            "type": "list",
            "data": {
                "style": "unordered",
                "items": [{
                    "content": "<b>top</b>",
                    "items": [{ "content": "deep<script>x()</script>", "items": [] }]
                }]
            }
        }]));
        sanitize_document(&mut document);

        let items = &document.blocks[0].data["items"];
        assert_eq!(items[0]["content"], "<b>top</b>");
        assert_eq!(items[0]["items"][0]["content"], "deep");
        assert_eq!(items[0]["items"][0]["items"], json!([]));
    }

    #[test]
    fn sanitize_document_leaves_code_untouched() {
        let mut document = doc(json!([
            { "type": "code", "data": { "code": "<script>x</script>" } }
        ]));
        sanitize_document(&mut document);
        assert_eq!(document.blocks[0].data["code"], "<script>x</script>");
    }

    #[test]
    fn sanitize_document_keeps_unknown_blocks_verbatim() {
        let mut document = doc(json!([
            { "type": "carousel", "data": { "slides": ["<script>x</script>"] } }
        ]));
        let before = document.clone();
        sanitize_document(&mut document);
        assert_eq!(document, before);
    }
}
