//! Block document schema.
//!
//! Two layers:
//! - Wire shapes ([`Document`], [`RawBlock`]) that mirror the editor's JSON
//!   output and never fail to decode a block.
//! - The normalized [`Block`] enum, produced once per block by
//!   [`Block::from_raw`], with every default already applied.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::markup::TrustedHtml;

/// A block document as produced by the editor and stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Editor save time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    /// Blocks in rendering order.
    pub blocks: Vec<RawBlock>,

    /// Editor version that produced the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Document {
    /// Create a document from blocks.
    pub fn new(blocks: Vec<RawBlock>) -> Self {
        Self {
            time: None,
            blocks,
            version: None,
        }
    }

    /// Decode a document from an arbitrary JSON value.
    ///
    /// Returns `None` when the value has no `blocks` sequence: that is the
    /// "no content" case, not an error. Individual blocks always decode.
    pub fn from_value(value: &Value) -> Option<Self> {
        let blocks = value.get("blocks")?.as_array()?;
        Some(Self {
            time: value.get("time").and_then(Value::as_i64),
            blocks: blocks.iter().map(RawBlock::from_value).collect(),
            version: value
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Append a typed block in its wire shape.
    pub fn push(&mut self, block: &Block) {
        self.blocks.push(RawBlock::from(block));
    }

    /// Iterate over the normalized blocks.
    pub fn normalized(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks.iter().map(Block::from_raw)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block in wire form: a type tag plus an untyped data payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub data: Value,
    /// Other block-level keys (`id`, `tunes`, ...), carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawBlock {
    pub fn new(block_type: impl Into<String>, data: Value) -> Self {
        Self {
            block_type: block_type.into(),
            data,
            extra: Map::new(),
        }
    }

    /// Decode a block from any JSON value.
    ///
    /// A missing or non-string `type` becomes the empty string, and a missing
    /// or non-object `data` becomes `{}`.
    pub fn from_value(value: &Value) -> Self {
        let block_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let data = match value.get("data") {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            _ => Value::Object(Map::new()),
        };
        let extra = value
            .as_object()
            .map(|block| {
                block
                    .iter()
                    .filter(|(key, _)| key.as_str() != "type" && key.as_str() != "data")
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            block_type,
            data,
            extra,
        }
    }
}

impl<'de> Deserialize<'de> for RawBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// The nine block kinds the renderer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Header,
    Paragraph,
    List,
    Quote,
    Code,
    Delimiter,
    Image,
    Table,
    Warning,
}

impl BlockKind {
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Header,
        BlockKind::Paragraph,
        BlockKind::List,
        BlockKind::Quote,
        BlockKind::Code,
        BlockKind::Delimiter,
        BlockKind::Image,
        BlockKind::Table,
        BlockKind::Warning,
    ];

    /// The wire `type` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::Delimiter => "delimiter",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::Warning => "warning",
        }
    }

    /// Look up a kind by its wire `type` tag.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == type_name)
    }
}

/// A normalized block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Header(Header),
    Paragraph(Paragraph),
    List(List),
    Quote(Quote),
    Code(Code),
    Delimiter,
    Image(Image),
    Table(Table),
    Warning(Warning),
    /// A block whose type tag is not one of the known kinds.
    Unknown(UnknownBlock),
}

/// Heading level, defaulting to level 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    #[default]
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Map a level number to a heading level, if it is in 1–6.
    pub fn from_number(level: i64) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            5 => Some(HeadingLevel::H5),
            6 => Some(HeadingLevel::H6),
            _ => None,
        }
    }

    /// Normalize a raw `level` field. Numeric strings are accepted; anything
    /// missing, non-numeric or out of range yields the default.
    pub fn from_raw(level: Option<&Value>) -> Self {
        let number = match level {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        number.and_then(Self::from_number).unwrap_or_default()
    }

    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }

    /// The HTML tag name.
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

/// List style, defaulting to unordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn from_raw(style: Option<&Value>) -> Self {
        match style.and_then(Value::as_str) {
            Some("ordered") => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Plain text; escaped on output.
    pub text: String,
    pub level: HeadingLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: TrustedHtml,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub style: ListStyle,
    pub items: Vec<TrustedHtml>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub text: TrustedHtml,
    /// Attribution; plain text.
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    /// Source code; always rendered as literal text.
    pub code: String,
    /// Optional syntax name used for highlighting.
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Resolved source: `file.url`, else `url`, else none.
    pub url: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<TrustedHtml>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub block_type: String,
    pub data: Value,
}

impl Block {
    /// Normalize a wire block. Never fails: malformed fields fall back to
    /// their defaults and unknown tags become [`Block::Unknown`].
    pub fn from_raw(raw: &RawBlock) -> Self {
        let data = &raw.data;
        let Some(kind) = BlockKind::from_type_name(&raw.block_type) else {
            return Block::Unknown(UnknownBlock {
                block_type: raw.block_type.clone(),
                data: data.clone(),
            });
        };

        match kind {
            BlockKind::Header => Block::Header(Header {
                text: string_field(data, "text"),
                level: HeadingLevel::from_raw(data.get("level")),
            }),
            BlockKind::Paragraph => Block::Paragraph(Paragraph {
                text: markup_field(data, "text"),
            }),
            BlockKind::List => Block::List(List {
                style: ListStyle::from_raw(data.get("style")),
                items: data
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(list_item).collect())
                    .unwrap_or_default(),
            }),
            BlockKind::Quote => Block::Quote(Quote {
                text: markup_field(data, "text"),
                caption: non_empty_field(data, "caption"),
            }),
            BlockKind::Code => Block::Code(Code {
                code: string_field(data, "code"),
                language: non_empty_field(data, "language").map(|l| l.trim().to_string()),
            }),
            BlockKind::Delimiter => Block::Delimiter,
            BlockKind::Image => Block::Image(Image {
                url: data
                    .get("file")
                    .and_then(|file| non_empty_field(file, "url"))
                    .or_else(|| non_empty_field(data, "url")),
                caption: non_empty_field(data, "caption"),
            }),
            BlockKind::Table => Block::Table(Table {
                rows: data
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|rows| rows.iter().map(table_row).collect())
                    .unwrap_or_default(),
            }),
            BlockKind::Warning => Block::Warning(Warning {
                title: string_field(data, "title"),
                message: string_field(data, "message"),
            }),
        }
    }

    /// The known kind, or `None` for [`Block::Unknown`].
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Header(_) => Some(BlockKind::Header),
            Block::Paragraph(_) => Some(BlockKind::Paragraph),
            Block::List(_) => Some(BlockKind::List),
            Block::Quote(_) => Some(BlockKind::Quote),
            Block::Code(_) => Some(BlockKind::Code),
            Block::Delimiter => Some(BlockKind::Delimiter),
            Block::Image(_) => Some(BlockKind::Image),
            Block::Table(_) => Some(BlockKind::Table),
            Block::Warning(_) => Some(BlockKind::Warning),
            Block::Unknown(_) => None,
        }
    }

    /// The wire `type` tag of this block.
    pub fn type_name(&self) -> &str {
        match self {
            Block::Unknown(unknown) => &unknown.block_type,
            known => known.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }
}

impl From<&Block> for RawBlock {
    fn from(block: &Block) -> Self {
        let mut data = Map::new();
        match block {
            Block::Header(header) => {
                data.insert("text".into(), Value::String(header.text.clone()));
                data.insert("level".into(), Value::from(header.level.number()));
            }
            Block::Paragraph(paragraph) => {
                data.insert("text".into(), markup_value(&paragraph.text));
            }
            Block::List(list) => {
                data.insert("style".into(), Value::String(list.style.as_str().into()));
                data.insert(
                    "items".into(),
                    Value::Array(list.items.iter().map(markup_value).collect()),
                );
            }
            Block::Quote(quote) => {
                data.insert("text".into(), markup_value(&quote.text));
                if let Some(caption) = &quote.caption {
                    data.insert("caption".into(), Value::String(caption.clone()));
                }
            }
            Block::Code(code) => {
                data.insert("code".into(), Value::String(code.code.clone()));
                if let Some(language) = &code.language {
                    data.insert("language".into(), Value::String(language.clone()));
                }
            }
            Block::Delimiter => {}
            Block::Image(image) => {
                if let Some(url) = &image.url {
                    data.insert("file".into(), serde_json::json!({ "url": url }));
                }
                if let Some(caption) = &image.caption {
                    data.insert("caption".into(), Value::String(caption.clone()));
                }
            }
            Block::Table(table) => {
                let rows = table
                    .rows
                    .iter()
                    .map(|row| Value::Array(row.iter().map(markup_value).collect()))
                    .collect();
                data.insert("content".into(), Value::Array(rows));
            }
            Block::Warning(warning) => {
                data.insert("title".into(), Value::String(warning.title.clone()));
                data.insert("message".into(), Value::String(warning.message.clone()));
            }
            Block::Unknown(unknown) => {
                return RawBlock::new(unknown.block_type.clone(), unknown.data.clone());
            }
        }
        RawBlock::new(block.type_name(), Value::Object(data))
    }
}

fn string_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_empty_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn markup_field(data: &Value, key: &str) -> TrustedHtml {
    TrustedHtml::assume_sanitized(string_field(data, key))
}

fn markup_value(html: &TrustedHtml) -> Value {
    Value::String(html.as_str().to_string())
}

/// List items are plain strings, or `{ "content": "..." }` objects from the
/// nested list tool.
fn list_item(item: &Value) -> TrustedHtml {
    let content = item
        .as_str()
        .or_else(|| item.get("content").and_then(Value::as_str))
        .unwrap_or_default();
    TrustedHtml::assume_sanitized(content)
}

fn table_row(row: &Value) -> Vec<TrustedHtml> {
    row.as_array()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| TrustedHtml::assume_sanitized(cell.as_str().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default()
}
