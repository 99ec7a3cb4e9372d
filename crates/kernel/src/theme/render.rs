//! Render tree consumer - converts RenderElement trees to HTML.

use std::fmt::Write;

use agora_sdk::render::{Content, RenderElement};

use crate::routes::helpers::html_escape;

/// Elements written without a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "link"];

/// Consumer that converts RenderElement trees to HTML.
pub struct RenderTreeConsumer {
    _private: (),
}

impl RenderTreeConsumer {
    /// Create a new render tree consumer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Render a RenderElement tree to HTML.
    ///
    /// Text content and attribute values are escaped; markup content is
    /// written as-is.
    pub fn to_html(&self, element: &RenderElement) -> String {
        let mut html = String::new();
        self.render_element(element, &mut html);
        html
    }

    /// Render a single element and its children.
    fn render_element(&self, element: &RenderElement, html: &mut String) {
        let tag = element.tag.as_str();
        html.push('<');
        html.push_str(tag);
        html.push_str(&self.get_class_attr(element));
        html.push_str(&self.get_extra_attrs(element));
        html.push('>');

        if VOID_ELEMENTS.contains(&tag) {
            return;
        }

        match &element.content {
            Some(Content::Text(text)) => html.push_str(&html_escape(text)),
            Some(Content::Markup(markup)) => html.push_str(markup.as_str()),
            None => {}
        }
        for child in &element.children {
            self.render_element(child, html);
        }

        // write!() to String is infallible
        let _ = write!(html, "</{tag}>");
    }

    /// Class attribute, or nothing when the element has no classes.
    fn get_class_attr(&self, element: &RenderElement) -> String {
        if element.classes.is_empty() {
            return String::new();
        }
        format!(" class=\"{}\"", html_escape(&element.classes.join(" ")))
    }

    /// Remaining attributes, in key order.
    fn get_extra_attrs(&self, element: &RenderElement) -> String {
        element
            .attributes
            .iter()
            .filter(|(k, _)| k.as_str() != "class")
            .map(|(k, v)| format!(" {}=\"{}\"", k, html_escape(v)))
            .collect()
    }
}

impl Default for RenderTreeConsumer {
    fn default() -> Self {
        Self::new()
    }
}
