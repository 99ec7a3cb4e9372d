//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::client::PortalClient;
use crate::config::Config;
use crate::content::BlockTypeRegistry;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Backend API client.
    client: PortalClient,

    /// Page templates.
    theme: Arc<ThemeEngine>,

    /// Block type definitions used by the validation endpoint.
    block_types: BlockTypeRegistry,
}

impl AppState {
    /// Build state from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = PortalClient::from_config(config).context("failed to create backend client")?;
        let theme = ThemeEngine::new(config.templates_dir.as_deref())
            .context("failed to load templates")?;

        info!(
            backend = %client.base_url(),
            templates = ?config.templates_dir,
            "application state ready"
        );

        Ok(Self::from_parts(client, theme))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(client: PortalClient, theme: ThemeEngine) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                client,
                theme: Arc::new(theme),
                block_types: BlockTypeRegistry::with_standard_types(),
            }),
        }
    }

    /// Get the backend client.
    pub fn client(&self) -> &PortalClient {
        &self.inner.client
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Get the block type registry.
    pub fn block_types(&self) -> &BlockTypeRegistry {
        &self.inner.block_types
    }
}
