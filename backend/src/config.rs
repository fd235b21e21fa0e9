//! # Backend Configuration
//!
//! Settings are read from a YAML file and then from environment overrides.
//! Every field has a default, so an absent file is not an error.
//!
//! ```yaml
//! database_url: "sqlite:baby_tracker.db"
//! bind_address: "127.0.0.1:3000"
//! reset_hour: 6
//! recent_limit: 50
//! weight_unit: "kg"
//! note_preview_chars: 40
//! cors_origin: "http://localhost:8080"
//! log_level: "info"
//! ```

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::{day_period::DEFAULT_RESET_HOUR, ActivityDisplayConfig, DEFAULT_RECENT_LIMIT};
use crate::storage::DEFAULT_DATABASE_URL;

/// Environment variable pointing at the YAML file
pub const CONFIG_PATH_ENV: &str = "BABY_TRACKER_CONFIG";
/// File looked up in the working directory when `BABY_TRACKER_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "baby_tracker.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Hour of day (0-23) at which "medicine given" resets
    pub reset_hour: u32,
    /// Events shown on page load
    pub recent_limit: u32,
    pub weight_unit: String,
    pub note_preview_chars: usize,
    /// Allowed cross-origin caller, if the page is served from elsewhere
    pub cors_origin: Option<String>,
    /// Filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let display = ActivityDisplayConfig::default();
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            reset_hour: DEFAULT_RESET_HOUR,
            recent_limit: DEFAULT_RECENT_LIMIT,
            weight_unit: display.weight_unit,
            note_preview_chars: display.note_preview_chars,
            cors_origin: None,
            log_level: "info".to_string(),
        }
    }
}

impl BackendConfig {
    /// Load from the configured file (if any) and the process environment
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            });

        let mut config = match path {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `BABY_TRACKER_*` overrides; `lookup` stands in for the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BABY_TRACKER_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(bind) = lookup("BABY_TRACKER_BIND") {
            self.bind_address = bind;
        }
        if let Some(hour) = lookup("BABY_TRACKER_RESET_HOUR") {
            self.reset_hour = hour
                .trim()
                .parse()
                .with_context(|| format!("BABY_TRACKER_RESET_HOUR is not a number: {}", hour))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.reset_hour > 23 {
            bail!("reset_hour must be between 0 and 23, got {}", self.reset_hour);
        }
        if self.recent_limit == 0 {
            bail!("recent_limit must be at least 1");
        }
        self.socket_addr()?;
        if let Some(origin) = &self.cors_origin {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid cors_origin: {}", origin))?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind_address: {}", self.bind_address))
    }

    pub fn display_config(&self) -> ActivityDisplayConfig {
        ActivityDisplayConfig {
            weight_unit: self.weight_unit.clone(),
            note_preview_chars: self.note_preview_chars,
        }
    }
}
