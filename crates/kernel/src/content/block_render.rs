//! Block rendering for Editor.js documents.
//!
//! Converts a block document into one render element per block:
//! - Header, paragraph, list, quote, code, delimiter, image, table, warning
//! - Unknown block types become a visible diagnostic instead of an error
//! - A missing document (or one without a `blocks` sequence) becomes a single
//!   "content unavailable" placeholder
//!
//! Paragraph, list, quote and table content is `TrustedHtml` and is injected
//! without escaping; it was sanitized on the authoring path before storage
//! (see `content::sanitize`). Header, warning, caption and code text is
//! always emitted as escaped text.

use std::sync::LazyLock;

use agora_sdk::document::{
    Block, BlockKind, Code, Document, Header, HeadingLevel, Image, List, ListStyle, Quote, Table,
    UnknownBlock, Warning,
};
use agora_sdk::markup::TrustedHtml;
use agora_sdk::render::{self, RenderElement};
use serde::Serialize;
use serde_json::Value;
use syntect::easy::HighlightLines;
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

use crate::theme::RenderTreeConsumer;

/// Text shown when there is no document to render.
pub const CONTENT_UNAVAILABLE: &str = "Content unavailable.";

const PLACEHOLDER_CLASS: &str = "text-gray-500";
const PROSE_CLASS: &str = "prose prose-lg max-w-none";

const PARAGRAPH_CLASS: &str = "text-gray-700 mb-4 leading-relaxed";
const ORDERED_LIST_CLASS: &str = "list-decimal list-inside mb-4 space-y-2 text-gray-700";
const UNORDERED_LIST_CLASS: &str = "list-disc list-inside mb-4 space-y-2 text-gray-700";
const QUOTE_CLASS: &str =
    "border-l-4 border-[#c9151b] pl-4 italic text-gray-700 mb-4 bg-[#fde9e9] py-3";
const QUOTE_CAPTION_CLASS: &str = "block mt-2 text-sm text-gray-600";
const CODE_CLASS: &str = "bg-gray-900 text-gray-100 p-4 rounded-lg overflow-x-auto mb-4";
const DELIMITER_CLASS: &str = "my-6 border-t-2 border-gray-300";
const FIGURE_CLASS: &str = "mb-6";
const IMAGE_CLASS: &str = "w-full rounded-lg shadow-md";
const FIGCAPTION_CLASS: &str = "text-center text-sm text-gray-600 mt-2";
const TABLE_WRAPPER_CLASS: &str = "overflow-x-auto mb-4";
const TABLE_CLASS: &str = "min-w-full border border-gray-300";
const TABLE_EVEN_ROW_CLASS: &str = "bg-gray-50";
const TABLE_ODD_ROW_CLASS: &str = "bg-white";
const TABLE_CELL_CLASS: &str = "border border-gray-300 px-4 py-2 text-gray-700";
const WARNING_CLASS: &str = "bg-yellow-50 border-l-4 border-yellow-400 p-4 mb-4";
const WARNING_TITLE_CLASS: &str = "font-semibold text-yellow-800";
const WARNING_MESSAGE_CLASS: &str = "text-yellow-700 mt-1";
const UNSUPPORTED_CLASS: &str = "bg-gray-100 p-3 rounded mb-4 text-gray-500 text-sm";

// Pre-loaded syntect resources; loading them is expensive.
static SYNTAX_SET: LazyLock<syntect::parsing::SyntaxSet> =
    LazyLock::new(syntect::parsing::SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<syntect::highlighting::ThemeSet> =
    LazyLock::new(syntect::highlighting::ThemeSet::load_defaults);

/// What a render node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single node emitted for a missing document.
    Placeholder,
    Block(BlockKind),
    /// Diagnostic for a block type outside the known set.
    Unsupported,
}

/// One rendered block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    /// Position of the source block. Only used as a rendering key.
    pub key: usize,
    pub kind: NodeKind,
    pub element: RenderElement,
}

/// Render a stored document value.
///
/// `None`, non-objects and objects without a `blocks` sequence all yield the
/// single placeholder node.
pub fn render_value(value: Option<&Value>) -> Vec<RenderNode> {
    let document = value.and_then(Document::from_value);
    render_document(document.as_ref())
}

/// Render a document into one node per block, in block order.
pub fn render_document(document: Option<&Document>) -> Vec<RenderNode> {
    let Some(document) = document else {
        debug!("no document to render; emitting placeholder");
        return vec![placeholder()];
    };

    debug!(blocks = document.len(), "rendering document");
    document
        .normalized()
        .enumerate()
        .map(|(key, block)| render_block(key, &block))
        .collect()
}

/// Render a single normalized block.
pub fn render_block(key: usize, block: &Block) -> RenderNode {
    let element = match block {
        Block::Header(header) => render_header(header),
        Block::Paragraph(paragraph) => render::markup("p", paragraph.text.clone())
            .class(PARAGRAPH_CLASS)
            .build(),
        Block::List(list) => render_list(list),
        Block::Quote(quote) => render_quote(quote),
        Block::Code(code) => render_code(code),
        Block::Delimiter => render::element("hr").class(DELIMITER_CLASS).build(),
        Block::Image(image) => render_image(image),
        Block::Table(table) => render_table(table),
        Block::Warning(warning) => render_warning(warning),
        Block::Unknown(unknown) => {
            return RenderNode {
                key,
                kind: NodeKind::Unsupported,
                element: render_unsupported(key, unknown),
            };
        }
    };

    let kind = block
        .kind()
        .map(NodeKind::Block)
        .unwrap_or(NodeKind::Unsupported);
    RenderNode { key, kind, element }
}

/// Render a stored document value straight to HTML.
pub fn render_html(value: Option<&Value>) -> String {
    nodes_to_html(&render_value(value))
}

/// Serialize rendered nodes inside the prose wrapper, each in a keyed `div`.
pub fn nodes_to_html(nodes: &[RenderNode]) -> String {
    let wrapper = render::container()
        .class(PROSE_CLASS)
        .children(nodes.iter().map(|node| {
            render::container()
                .attr("data-block", &node.key.to_string())
                .child(node.element.clone())
                .build()
        }))
        .build();
    RenderTreeConsumer::new().to_html(&wrapper)
}

fn placeholder() -> RenderNode {
    RenderNode {
        key: 0,
        kind: NodeKind::Placeholder,
        element: render::text("p", CONTENT_UNAVAILABLE)
            .class(PLACEHOLDER_CLASS)
            .build(),
    }
}

fn render_header(header: &Header) -> RenderElement {
    render::text(header.level.tag(), &header.text)
        .class(header_class(header.level))
        .build()
}

/// Level 1 is the most prominent, level 6 the least.
fn header_class(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "text-4xl font-bold mb-4 text-gray-900",
        HeadingLevel::H2 => "text-3xl font-bold mb-3 text-gray-800",
        HeadingLevel::H3 => "text-2xl font-semibold mb-3 text-gray-800",
        HeadingLevel::H4 => "text-xl font-semibold mb-2 text-gray-700",
        HeadingLevel::H5 => "text-lg font-semibold mb-2 text-gray-700",
        HeadingLevel::H6 => "text-base font-semibold mb-2 text-gray-700",
    }
}

fn render_list(list: &List) -> RenderElement {
    let (tag, class) = match list.style {
        ListStyle::Ordered => ("ol", ORDERED_LIST_CLASS),
        ListStyle::Unordered => ("ul", UNORDERED_LIST_CLASS),
    };
    render::element(tag)
        .class(class)
        .children(
            list.items
                .iter()
                .map(|item| render::markup("li", item.clone()).build()),
        )
        .build()
}

fn render_quote(quote: &Quote) -> RenderElement {
    let mut builder = render::element("blockquote")
        .class(QUOTE_CLASS)
        .child(render::markup("p", quote.text.clone()).build());
    if let Some(caption) = &quote.caption {
        builder = builder.child(
            render::text("cite", &format!("— {caption}"))
                .class(QUOTE_CAPTION_CLASS)
                .build(),
        );
    }
    builder.build()
}

/// Code is literal text. With a known `language` it is highlighted by
/// syntect, which escapes every token; otherwise it is plain escaped text.
fn render_code(code: &Code) -> RenderElement {
    let highlighted = code
        .language
        .as_deref()
        .and_then(|language| highlight(&code.code, language).map(|html| (language, html)));

    let inner = match highlighted {
        Some((language, html)) => render::markup("code", html)
            .class(&format!("language-{language}"))
            .build(),
        None => render::text("code", &code.code).build(),
    };

    render::element("pre").class(CODE_CLASS).child(inner).build()
}

/// Highlight line by line so only `<span>`s are produced; the surrounding
/// `pre` supplies the background.
fn highlight(code: &str, language: &str) -> Option<TrustedHtml> {
    let ss = &*SYNTAX_SET;
    let syntax = ss
        .find_syntax_by_token(language)
        .or_else(|| ss.find_syntax_by_name(language))?;
    let theme = THEME_SET
        .themes
        .get("base16-ocean.dark")
        .or_else(|| THEME_SET.themes.get("InspiredGitHub"))?;

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut html = String::new();
    for line in LinesWithEndings::from(code) {
        let spans = highlighter
            .highlight_line(line, ss)
            .and_then(|regions| styled_line_to_highlighted_html(&regions, IncludeBackground::No));
        match spans {
            Ok(spans) => html.push_str(&spans),
            Err(e) => {
                warn!(error = %e, language, "syntax highlighting failed; using plain text");
                return None;
            }
        }
    }
    Some(TrustedHtml::assume_sanitized(html))
}

/// A missing source still yields an `img` with an empty `src`.
fn render_image(image: &Image) -> RenderElement {
    let src = image.url.as_deref().unwrap_or_default();
    let alt = image.caption.as_deref().unwrap_or("Image");

    let mut builder = render::element("figure").class(FIGURE_CLASS).child(
        render::element("img")
            .class(IMAGE_CLASS)
            .attr("src", src)
            .attr("alt", alt)
            .build(),
    );
    if let Some(caption) = &image.caption {
        builder = builder.child(
            render::text("figcaption", caption)
                .class(FIGCAPTION_CLASS)
                .build(),
        );
    }
    builder.build()
}

fn render_table(table: &Table) -> RenderElement {
    let rows = table.rows.iter().enumerate().map(|(index, row)| {
        let class = if index % 2 == 0 {
            TABLE_EVEN_ROW_CLASS
        } else {
            TABLE_ODD_ROW_CLASS
        };
        render::element("tr")
            .class(class)
            .children(row.iter().map(|cell| {
                render::markup("td", cell.clone())
                    .class(TABLE_CELL_CLASS)
                    .build()
            }))
            .build()
    });

    render::container()
        .class(TABLE_WRAPPER_CLASS)
        .child(
            render::element("table")
                .class(TABLE_CLASS)
                .child(render::element("tbody").children(rows).build())
                .build(),
        )
        .build()
}

fn render_warning(warning: &Warning) -> RenderElement {
    render::container()
        .class(WARNING_CLASS)
        .attr("role", "note")
        .child(
            render::text("p", &warning.title)
                .class(WARNING_TITLE_CLASS)
                .build(),
        )
        .child(
            render::text("p", &warning.message)
                .class(WARNING_MESSAGE_CLASS)
                .build(),
        )
        .build()
}

fn render_unsupported(key: usize, unknown: &UnknownBlock) -> RenderElement {
    warn!(index = key, block_type = %unknown.block_type, "unsupported block type");
    render::text(
        "div",
        &format!("Unsupported block type: {}", unknown.block_type),
    )
    .class(UNSUPPORTED_CLASS)
    .build()
}
