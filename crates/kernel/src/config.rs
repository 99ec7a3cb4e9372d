//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base URL of the portal backend REST API
    /// (default: http://localhost:8000/api).
    pub api_base_url: String,

    /// Static bearer token sent to the backend, if any.
    pub api_token: Option<String>,

    /// Backend request timeout (default: 10 seconds).
    pub api_timeout: Duration,

    /// Directory of Tera templates overriding the built-in ones.
    pub templates_dir: Option<PathBuf>,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let parsed = url::Url::parse(&api_base_url)
            .with_context(|| format!("API_BASE_URL is not a valid URL: {api_base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("API_BASE_URL must use http or https, got {}", parsed.scheme());
        }

        let api_token = lookup("API_TOKEN").filter(|t| !t.trim().is_empty());

        let api_timeout_secs: u64 = lookup("API_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("API_TIMEOUT_SECS must be a whole number of seconds")?;

        let templates_dir = lookup("TEMPLATES_DIR").map(PathBuf::from);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            port,
            api_base_url,
            api_token,
            api_timeout: Duration::from_secs(api_timeout_secs),
            templates_dir,
            cors_allowed_origins,
        })
    }
}
