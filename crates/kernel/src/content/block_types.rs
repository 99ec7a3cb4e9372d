//! Block type registry and advisory block validation.
//!
//! Provides:
//! - `BlockTypeDefinition`: schema and metadata for a single block type
//! - `BlockTypeRegistry`: registry of known block types with validation
//! - `BlockIssue`: a validation message tied to a block position
//!
//! Validation is advisory. The renderer never consults the registry and
//! copes with any payload on its own.

use std::collections::HashMap;

use agora_sdk::document::{BlockKind, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sanitize::removes_markup;

/// Definition of a single block type in the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeDefinition {
    /// Wire type tag (e.g. "paragraph", "header").
    pub type_name: String,
    /// Human-readable label (e.g. "Paragraph", "Heading").
    pub label: String,
    /// JSON Schema describing the expected data shape.
    pub schema: Value,
    /// Text formats this block can use (e.g. "trusted_html", "plain_text").
    pub allowed_formats: Vec<String>,
}

/// A validation message for the block at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockIssue {
    pub index: usize,
    pub block_type: String,
    pub message: String,
}

/// Registry of block type definitions, keyed by type name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeRegistry {
    types: HashMap<String, BlockTypeDefinition>,
}

impl Default for BlockTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the nine standard block types.
    pub fn with_standard_types() -> Self {
        let mut registry = Self::new();
        registry.register_standard_types();
        registry
    }

    pub fn register(&mut self, definition: BlockTypeDefinition) {
        self.types.insert(definition.type_name.clone(), definition);
    }

    pub fn get(&self, type_name: &str) -> Option<&BlockTypeDefinition> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// List all registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Register header, paragraph, list, quote, code, delimiter, image,
    /// table and warning.
    pub fn register_standard_types(&mut self) {
        for kind in BlockKind::ALL {
            self.register(standard_definition(kind));
        }
    }

    /// Validate block data against the registered block type.
    ///
    /// Returns a list of messages; empty means the block is valid.
    pub fn validate_block(&self, type_name: &str, data: &Value) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.contains(type_name) {
            errors.push(format!("unknown block type '{type_name}'"));
            return errors;
        }

        // Custom registered types pass without built-in checks.
        let Some(kind) = BlockKind::from_type_name(type_name) else {
            return errors;
        };

        match kind {
            BlockKind::Header => {
                if data.get("text").and_then(Value::as_str).is_none() {
                    errors.push("header: missing required field 'text'".to_string());
                }
                match data.get("level") {
                    Some(level) => match level.as_i64() {
                        Some(n) if (1..=6).contains(&n) => {}
                        Some(n) => {
                            errors.push(format!("header: level must be between 1 and 6, got {n}"));
                        }
                        None => errors.push("header: level must be an integer".to_string()),
                    },
                    None => errors.push("header: missing required field 'level'".to_string()),
                }
            }
            BlockKind::Paragraph => {
                validate_markup_field(data, "text", "paragraph", &mut errors);
            }
            BlockKind::Quote => {
                validate_markup_field(data, "text", "quote", &mut errors);
            }
            BlockKind::List => match data.get("items") {
                Some(Value::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        let text = item
                            .as_str()
                            .or_else(|| item.get("content").and_then(Value::as_str));
                        match text {
                            Some(text) if is_clean(text) => {}
                            Some(_) => errors.push(format!(
                                "list: item {i} contains disallowed HTML that was sanitized"
                            )),
                            None => errors.push(format!("list: item {i} is not a string")),
                        }
                    }
                    if let Some(style) = data.get("style").and_then(Value::as_str)
                        && style != "ordered"
                        && style != "unordered"
                    {
                        errors.push(format!(
                            "list: style must be 'ordered' or 'unordered', got '{style}'"
                        ));
                    }
                }
                Some(_) => errors.push("list: 'items' must be an array".to_string()),
                None => errors.push("list: missing required field 'items'".to_string()),
            },
            BlockKind::Code => {
                if data.get("code").and_then(Value::as_str).is_none() {
                    errors.push("code: missing required field 'code'".to_string());
                }
            }
            BlockKind::Delimiter => {}
            BlockKind::Image => {
                let file_url = data
                    .get("file")
                    .and_then(|f| f.get("url"))
                    .and_then(Value::as_str)
                    .filter(|u| !u.is_empty());
                let url = data
                    .get("url")
                    .and_then(Value::as_str)
                    .filter(|u| !u.is_empty());
                if file_url.is_none() && url.is_none() {
                    errors.push("image: one of 'file.url' or 'url' is required".to_string());
                }
            }
            BlockKind::Table => match data.get("content") {
                Some(Value::Array(rows)) => {
                    for (r, row) in rows.iter().enumerate() {
                        let Some(cells) = row.as_array() else {
                            errors.push(format!("table: row {r} must be an array"));
                            continue;
                        };
                        for (c, cell) in cells.iter().enumerate() {
                            match cell.as_str() {
                                Some(text) if is_clean(text) => {}
                                Some(_) => errors.push(format!(
                                    "table: cell {r}:{c} contains disallowed HTML that was sanitized"
                                )),
                                None => {
                                    errors.push(format!("table: cell {r}:{c} is not a string"));
                                }
                            }
                        }
                    }
                }
                Some(_) => errors.push("table: 'content' must be an array of rows".to_string()),
                None => errors.push("table: missing required field 'content'".to_string()),
            },
            BlockKind::Warning => {
                for field in ["title", "message"] {
                    if data.get(field).and_then(Value::as_str).is_none() {
                        errors.push(format!("warning: missing required field '{field}'"));
                    }
                }
            }
        }

        errors
    }

    /// Validate every block of a document, tagging messages with positions.
    pub fn validate_document(&self, document: &Document) -> Vec<BlockIssue> {
        document
            .blocks
            .iter()
            .enumerate()
            .flat_map(|(index, block)| {
                self.validate_block(&block.block_type, &block.data)
                    .into_iter()
                    .map(move |message| BlockIssue {
                        index,
                        block_type: block.block_type.clone(),
                        message,
                    })
            })
            .collect()
    }
}

fn standard_definition(kind: BlockKind) -> BlockTypeDefinition {
    let markup = || vec!["trusted_html".to_string()];
    let plain = || vec!["plain_text".to_string()];

    let (label, schema, allowed_formats) = match kind {
        BlockKind::Header => (
            "Heading",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "level": { "type": "integer", "minimum": 1, "maximum": 6 }
                },
                "required": ["text", "level"]
            }),
            plain(),
        ),
        BlockKind::Paragraph => (
            "Paragraph",
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }),
            markup(),
        ),
        BlockKind::List => (
            "List",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "style": { "type": "string", "enum": ["ordered", "unordered"] },
                    "items": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["items"]
            }),
            markup(),
        ),
        BlockKind::Quote => (
            "Quote",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "caption": { "type": "string" }
                },
                "required": ["text"]
            }),
            markup(),
        ),
        BlockKind::Code => (
            "Code",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "language": { "type": "string" }
                },
                "required": ["code"]
            }),
            plain(),
        ),
        BlockKind::Delimiter => (
            "Delimiter",
            serde_json::json!({ "type": "object", "properties": {} }),
            vec![],
        ),
        BlockKind::Image => (
            "Image",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "file": {
                        "type": "object",
                        "properties": { "url": { "type": "string", "minLength": 1 } }
                    },
                    "url": { "type": "string", "minLength": 1 },
                    "caption": { "type": "string" }
                },
                "anyOf": [{ "required": ["file"] }, { "required": ["url"] }]
            }),
            plain(),
        ),
        BlockKind::Table => (
            "Table",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "array",
                        "items": { "type": "array", "items": { "type": "string" } }
                    }
                },
                "required": ["content"]
            }),
            markup(),
        ),
        BlockKind::Warning => (
            "Warning",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "message": { "type": "string" }
                },
                "required": ["title", "message"]
            }),
            plain(),
        ),
    };

    BlockTypeDefinition {
        type_name: kind.as_str().to_string(),
        label: label.to_string(),
        schema,
        allowed_formats,
    }
}

fn is_clean(text: &str) -> bool {
    !removes_markup(text)
}

/// Flag a markup field that sanitization would change. A missing field is
/// not reported; the renderer treats it as empty.
fn validate_markup_field(data: &Value, field: &str, block_type: &str, errors: &mut Vec<String>) {
    if let Some(text) = data.get(field).and_then(Value::as_str)
        && !is_clean(text)
    {
        errors.push(format!(
            "{block_type}: '{field}' contains disallowed HTML that was sanitized"
        ));
    }
}
