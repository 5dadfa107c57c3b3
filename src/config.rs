//! Application configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! environment variables (a `.env` file is honored via `dotenvy`), then CLI
//! flags applied by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming the content API base URL.
pub const API_ENV: &str = "BLOG_SEARCH_API";
/// Variable name used by the web front-end; accepted as a fallback.
pub const LEGACY_API_ENV: &str = "NEXT_PUBLIC_WORDPRESS_API";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base of the REST API, e.g. `https://example.com/wp-json/wp/v2`.
    pub api_base: Option<String>,
    pub site_url: String,
    pub timeout_ms: u64,
    pub debounce_ms: u64,
    /// Maximum results requested per search.
    pub search_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            site_url: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
            debounce_ms: 300,
            search_limit: 5,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&body).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(body: &str) -> Result<Self> {
        Ok(toml::from_str(body)?)
    }

    /// Override fields from environment variables that are set and valid.
    pub fn apply_env(&mut self) {
        if let Ok(url) = dotenvy::var(API_ENV).or_else(|_| dotenvy::var(LEGACY_API_ENV))
            && !url.trim().is_empty()
        {
            self.api_base = Some(url);
        }

        if let Ok(url) = dotenvy::var("BLOG_SEARCH_SITE_URL") {
            self.site_url = url;
        }

        if let Ok(val) = dotenvy::var("BLOG_SEARCH_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.timeout_ms = ms;
        }

        if let Ok(val) = dotenvy::var("BLOG_SEARCH_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.debounce_ms = ms;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "ryznotes", "blog-search")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
