//! Agora Content SDK
//!
//! The block document contract shared by the authoring tool, the backend
//! and the renderer. Documents travel as Editor.js-style JSON; this crate
//! decodes them tolerantly, normalizes each block into a closed enum, and
//! defines the render element tree the kernel's renderer emits.

pub mod document;
pub mod markup;
pub mod render;

pub mod prelude {
    pub use crate::document::*;
    pub use crate::markup::TrustedHtml;
    pub use crate::render;
    pub use crate::render::{Content, RenderElement};
}
