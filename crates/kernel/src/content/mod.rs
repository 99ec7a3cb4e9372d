//! Content module.
//!
//! This module provides:
//! - Block rendering: Editor.js documents to render elements and HTML
//! - BlockTypeRegistry: Block type definitions and advisory validation
//! - Sanitization of editor markup before storage
//! - Authoring: DocumentBuilder and post drafts

pub mod authoring;
pub mod block_render;
pub mod block_types;
pub mod sanitize;

pub use authoring::{DocumentBuilder, DraftError, PostDraft, PostSubmission};
pub use block_render::{
    CONTENT_UNAVAILABLE, NodeKind, RenderNode, nodes_to_html, render_block, render_document,
    render_html, render_value,
};
pub use block_types::{BlockIssue, BlockTypeDefinition, BlockTypeRegistry};
pub use sanitize::{sanitize_document, sanitize_markup};
