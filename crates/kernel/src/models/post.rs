//! Post model: a portal post as returned by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Post identifier. The backend may send numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl Default for PostId {
    fn default() -> Self {
        PostId::Number(0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

/// A published post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: PostId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub excerpt: Option<String>,

    /// Category slug. Unknown slugs are displayed verbatim.
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub pdf_file: Option<String>,

    /// Publication date as sent by the backend.
    #[serde(default)]
    pub post_day: Option<String>,

    #[serde(default)]
    pub views: Option<u64>,

    #[serde(default)]
    pub likes: Option<u64>,

    /// Stored block document. Some backends send it JSON-encoded as a string.
    #[serde(default)]
    pub content: Value,
}

impl Post {
    /// The stored document as a JSON value, decoding string-encoded content.
    ///
    /// Returns `None` when there is no content or it cannot be decoded; the
    /// renderer turns that into its placeholder.
    pub fn document(&self) -> Option<Value> {
        match &self.content {
            Value::Null => None,
            Value::String(encoded) => serde_json::from_str(encoded).ok(),
            other => Some(other.clone()),
        }
    }

    /// Display label for the post's category.
    pub fn category_label(&self) -> String {
        Category::from_slug(&self.category)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| self.category.clone())
    }
}

/// Post categories offered by the writer form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    News,
    Events,
    Clubs,
    StudentLife,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::News,
        Category::Events,
        Category::Clubs,
        Category::StudentLife,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Events => "events",
            Category::Clubs => "clubs",
            Category::StudentLife => "student-life",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Events => "Events",
            Category::Clubs => "Clubs",
            Category::StudentLife => "Student Life",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}
