//! Render element builder API.
//!
//! The block renderer returns structured render elements, never HTML
//! strings. The kernel serializes them; text content and attribute values
//! are escaped at that point, [`Content::Markup`] is written verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::markup::TrustedHtml;

/// A node in the render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Content emitted before the children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderElement>,
}

/// Element content, tagged with how it must be written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum Content {
    /// Plain text, escaped on output.
    Text(String),
    /// Pre-sanitized markup, written as-is.
    Markup(TrustedHtml),
}

impl RenderElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Concatenated content of this element and its descendants, in
    /// document order. Markup is included as its source string.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.content {
            Some(Content::Text(text)) => out.push_str(text),
            Some(Content::Markup(html)) => out.push_str(html.as_str()),
            None => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First descendant-or-self with the given tag, depth first.
    pub fn find(&self, tag: &str) -> Option<&RenderElement> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(tag))
    }

    /// All descendants-or-self with the given tag, depth first.
    pub fn find_all(&self, tag: &str) -> Vec<&RenderElement> {
        let mut found = Vec::new();
        self.collect_tag(tag, &mut found);
        found
    }

    fn collect_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a RenderElement>) {
        if self.tag == tag {
            found.push(self);
        }
        for child in &self.children {
            child.collect_tag(tag, found);
        }
    }
}

/// Builder for constructing render elements.
pub struct ElementBuilder {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    content: Option<Content>,
    children: Vec<RenderElement>,
}

impl ElementBuilder {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            content: None,
            children: Vec::new(),
        }
    }

    /// Add classes; a space-separated list adds each entry.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.content = Some(Content::Text(value.into()));
        self
    }

    pub fn markup(mut self, value: TrustedHtml) -> Self {
        self.content = Some(Content::Markup(value));
        self
    }

    pub fn child(mut self, element: RenderElement) -> Self {
        self.children.push(element);
        self
    }

    pub fn children(mut self, elements: impl IntoIterator<Item = RenderElement>) -> Self {
        self.children.extend(elements);
        self
    }

    pub fn build(self) -> RenderElement {
        RenderElement {
            tag: self.tag,
            classes: self.classes,
            attributes: self.attributes,
            content: self.content,
            children: self.children,
        }
    }
}

/// Create an element with the given tag.
pub fn element(tag: &str) -> ElementBuilder {
    ElementBuilder::new(tag)
}

/// Create a `div` that groups children.
pub fn container() -> ElementBuilder {
    ElementBuilder::new("div")
}

/// Create an element holding escaped text.
pub fn text(tag: &str, value: &str) -> ElementBuilder {
    ElementBuilder::new(tag).text(value)
}

/// Create an element holding trusted markup.
pub fn markup(tag: &str, value: TrustedHtml) -> ElementBuilder {
    ElementBuilder::new(tag).markup(value)
}
