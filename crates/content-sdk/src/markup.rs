//! Trusted markup wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An HTML fragment that was sanitized before it reached the renderer.
///
/// The renderer injects values of this type verbatim. Every other string it
/// handles is treated as text and escaped on output, so the only way to get
/// raw markup onto a page is to construct one of these.
///
/// Stored documents deserialize straight into `TrustedHtml`: the backend only
/// persists content that went through sanitization on submit. Code that takes
/// markup from anywhere else must run it through the kernel's
/// `content::sanitize::sanitize_markup` instead of calling
/// [`TrustedHtml::assume_sanitized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wrap markup the caller guarantees has already been sanitized.
    pub fn assume_sanitized(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// An empty fragment.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Borrow the markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the underlying markup string.
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for TrustedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
