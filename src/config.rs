//! Configuration file parser for ~/.config/textfmt/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning for each one
//! since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::format::{MoneyFormat, PhoneFormat};
use crate::limit::LimitConfig;
use crate::unique::UniqueConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Formatting defaults shared by every call site.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root that relative "read more" links are resolved against.
    pub base_url: Option<String>,

    /// strftime pattern for dates.
    pub date_format: String,

    /// strftime pattern for dates with a time of day.
    pub datetime_format: String,

    /// Labels for booleans as `"Yes/No"`.
    pub bool_to_str: String,

    pub money: MoneyFormat,

    pub phone: PhoneFormat,

    pub string_limit: LimitConfig,

    pub unique: UniqueConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            date_format: "%B %-d, %Y".to_string(),
            datetime_format: "%B %-d, %Y at %-I:%M%P".to_string(),
            bool_to_str: "Yes/No".to_string(),
            money: MoneyFormat::default(),
            phone: PhoneFormat::default(),
            string_limit: LimitConfig::default(),
            unique: UniqueConfig::default(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "base_url",
        "date_format",
        "datetime_format",
        "bool_to_str",
        "money",
        "phone",
        "string_limit",
        "unique",
    ];

    /// Default location: `$HOME/.config/textfmt/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("textfmt")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Size check first so a huge file is never read into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            base_url = ?config.base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Limiter options with a relative `exceeded_link_url` resolved against
    /// `base_url`.
    ///
    /// An unparseable base URL leaves the link untouched.
    pub fn string_limit(&self) -> LimitConfig {
        let mut limit = self.string_limit.clone();
        let (Some(base), Some(link)) = (&self.base_url, &self.string_limit.exceeded_link_url) else {
            return limit;
        };

        match Url::parse(base).and_then(|base| base.join(link)) {
            Ok(resolved) => limit.exceeded_link_url = Some(resolved.to_string()),
            Err(e) => {
                tracing::warn!(base_url = %base, link = %link, error = %e, "Cannot resolve exceeded link");
            }
        }
        limit
    }
}

// ============================================================================
// Tests
// ============================================================================
