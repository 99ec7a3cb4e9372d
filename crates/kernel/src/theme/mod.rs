//! Theme engine and template rendering.
//!
//! Provides Tera-based page templates with suggestion resolution and
//! RenderElement to HTML conversion.

mod engine;
mod render;

pub use engine::{SITE_NAME, ThemeEngine};
pub use render::RenderTreeConsumer;
