//! Authoring: building documents and preparing posts for submission.

use agora_sdk::document::{
    Block, Code, Document, Header, HeadingLevel, Image, List, ListStyle, Paragraph, Quote, Table,
    Warning,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::sanitize::{sanitize_document, sanitize_markup};
use crate::models::Category;

/// Version stamped on documents built here.
pub const DOCUMENT_VERSION: &str = concat!("agora-", env!("CARGO_PKG_VERSION"));

/// Status given to newly submitted posts; an editor publishes them later.
pub const STATUS_PENDING: &str = "pending";

/// Fluent builder for block documents.
///
/// Markup arguments are untrusted and sanitized as they are appended.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-typed block as-is.
    pub fn block(mut self, block: Block) -> Self {
        self.document.push(&block);
        self
    }

    pub fn header(self, text: &str, level: HeadingLevel) -> Self {
        self.block(Block::Header(Header {
            text: text.to_string(),
            level,
        }))
    }

    pub fn paragraph(self, markup: &str) -> Self {
        self.block(Block::Paragraph(Paragraph {
            text: sanitize_markup(markup),
        }))
    }

    pub fn list(self, style: ListStyle, items: &[&str]) -> Self {
        self.block(Block::List(List {
            style,
            items: items.iter().map(|item| sanitize_markup(item)).collect(),
        }))
    }

    pub fn quote(self, markup: &str, caption: Option<&str>) -> Self {
        self.block(Block::Quote(Quote {
            text: sanitize_markup(markup),
            caption: caption.map(str::to_string),
        }))
    }

    pub fn code(self, code: &str, language: Option<&str>) -> Self {
        self.block(Block::Code(Code {
            code: code.to_string(),
            language: language.map(str::to_string),
        }))
    }

    pub fn delimiter(self) -> Self {
        self.block(Block::Delimiter)
    }

    pub fn image(self, url: &str, caption: Option<&str>) -> Self {
        self.block(Block::Image(Image {
            url: Some(url.to_string()),
            caption: caption.map(str::to_string),
        }))
    }

    pub fn table(self, rows: &[&[&str]]) -> Self {
        self.block(Block::Table(Table {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| sanitize_markup(cell)).collect())
                .collect(),
        }))
    }

    pub fn warning(self, title: &str, message: &str) -> Self {
        self.block(Block::Warning(Warning {
            title: title.to_string(),
            message: message.to_string(),
        }))
    }

    /// Finish the document, stamping the save time and version.
    pub fn build(mut self) -> Document {
        self.document.time = Some(chrono::Utc::now().timestamp_millis());
        self.document.version = Some(DOCUMENT_VERSION.to_string());
        self.document
    }
}

/// Reasons a draft cannot be submitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    MissingTitle,

    #[error("excerpt is required")]
    MissingExcerpt,

    #[error("please add some content to your post")]
    EmptyContent,
}

/// A post being written, as entered in the writer form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub content: Document,
}

/// Request body for `POST /writer/posts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSubmission {
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    /// Empty when no image was uploaded.
    pub featured_image: String,
    pub pdf_file: String,
    pub content: Document,
    pub writer_id: u64,
    pub status: &'static str,
}

impl PostDraft {
    /// Validate the draft and turn it into a pending submission.
    ///
    /// Every markup field of the content is sanitized here; this is the
    /// last point before the document reaches storage.
    pub fn into_submission(self, writer_id: u64) -> Result<PostSubmission, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        let excerpt = self.excerpt.trim();
        if excerpt.is_empty() {
            return Err(DraftError::MissingExcerpt);
        }
        if self.content.is_empty() {
            return Err(DraftError::EmptyContent);
        }

        let mut content = self.content;
        sanitize_document(&mut content);

        info!(
            writer_id,
            blocks = content.len(),
            category = self.category.slug(),
            "prepared post submission"
        );

        Ok(PostSubmission {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            category: self.category,
            featured_image: self.featured_image.unwrap_or_default(),
            pdf_file: self.pdf_file.unwrap_or_default(),
            content,
            writer_id,
            status: STATUS_PENDING,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(content: Document) -> PostDraft {
        PostDraft {
            title: "Open Day".to_string(),
            excerpt: "Visit the campus".to_string(),
            category: Category::Events,
            content,
            ..Default::default()
        }
    }

    #[test]
    fn builder_stamps_time_and_version() {
        let document = DocumentBuilder::new().delimiter().build();
        assert_eq!(document.len(), 1);
        assert!(document.time.unwrap() > 0);
        assert_eq!(document.version.as_deref(), Some(DOCUMENT_VERSION));
    }

    #[test]
    fn builder_produces_wire_shapes() {
        let document = DocumentBuilder::new()
            .header("Welcome", HeadingLevel::H2)
            .list(ListStyle::Ordered, &["one", "two"])
            .image("https://cdn.example.edu/a.jpg", Some("Campus"))
            .table(&[&["A", "B"]])
            .build();

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["blocks"][0], json!({ "type": "header", "data": { "text": "Welcome", "level": 2 } }));
        assert_eq!(value["blocks"][1]["data"]["style"], "ordered");
        assert_eq!(value["blocks"][2]["data"]["file"]["url"], "https://cdn.example.edu/a.jpg");
        assert_eq!(value["blocks"][3]["data"]["content"], json!([["A", "B"]]));
    }

    #[test]
    fn builder_sanitizes_markup() {
        let document = DocumentBuilder::new()
            .paragraph("<b>ok</b><script>bad()</script>")
            .build();
        assert_eq!(document.blocks[0].data["text"], "<b>ok</b>");
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut d = draft(DocumentBuilder::new().delimiter().build());
        d.title = "   ".to_string();
        assert_eq!(d.into_submission(1), Err(DraftError::MissingTitle));
    }

    #[test]
    fn empty_excerpt_is_rejected() {
        let mut d = draft(DocumentBuilder::new().delimiter().build());
        d.excerpt = String::new();
        assert_eq!(d.into_submission(1), Err(DraftError::MissingExcerpt));
    }

    #[test]
    fn empty_content_is_rejected() {
        let d = draft(Document::default());
        assert_eq!(d.into_submission(1), Err(DraftError::EmptyContent));
    }

    #[test]
    fn submission_is_pending_and_sanitized() {
        let content = Document::from_value(&json!({
            "blocks": [{ "type": "paragraph", "data": { "text": "Hi<script>x</script>" } }]
        }))
        .unwrap();
        let submission = draft(content).into_submission(42).unwrap();

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["writer_id"], 42);
        assert_eq!(value["category"], "events");
        assert_eq!(value["featured_image"], "");
        assert_eq!(value["content"]["blocks"][0]["data"]["text"], "Hi");
    }
}
