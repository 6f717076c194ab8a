//! Bridge settings management

use crate::PathManager;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_DOCS_API_BASE: &str = "https://docs.googleapis.com/v1";
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Settings stored in `config.toml`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Host the MCP server binds to
    pub host: String,
    /// Port to listen on (0 picks a random free port)
    pub port: u16,
    /// Log level for the standalone binary
    pub log_level: String,
    /// Pre-issued OAuth bearer token for the Google APIs.
    /// A token in a request's `Authorization` header wins for that request.
    pub access_token: Option<String>,
    pub docs_api_base: String,
    pub drive_api_base: String,
    /// Page size used by Drive listings when the caller gives none
    pub default_page_size: usize,
    /// Upper bound on any Drive listing page size
    pub max_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "info".to_string(),
            access_token: None,
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl Settings {
    /// Load settings from the default path, apply environment overrides.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let mut settings = match PathManager::settings_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load settings from a specific file, without environment overrides
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `DOCS_MCP_*` and `GOOGLE_ACCESS_TOKEN` overrides.
    ///
    /// Takes a lookup function so tests can supply variables without touching
    /// the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DOCS_MCP_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DOCS_MCP_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid DOCS_MCP_PORT '{}': {}", port, e))?;
        }
        if let Some(level) = lookup("DOCS_MCP_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(token) = lookup("GOOGLE_ACCESS_TOKEN") {
            let token = token.trim();
            if !token.is_empty() {
                self.access_token = Some(token.to_string());
            }
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(anyhow!("Page sizes must be at least 1"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(anyhow!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            ));
        }
        Ok(())
    }

    /// Clamp a caller-supplied page size into `1..=max_page_size`
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

}
