// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replicator configuration
//!
//! Loaded once at startup from a TOML file and passed by reference into each
//! component's constructor. Nothing reads configuration after that.

use crate::key::KeyLayout;
use crate::retry::RetryPolicy;
use crate::transform::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest page the feed will serve
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default cap on one feed response body
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Environment variable consulted for the feed credential unless overridden
pub const DEFAULT_API_KEY_ENV: &str = "FEEDVAULT_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub feed: FeedConfig,
    pub archive: ArchiveConfig,
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Fallback credential when the environment variable is unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sent as `X-Effective-Client-Ids` when set
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Whole-request HTTP timeout; a stalled request surfaces as a transport error
    #[serde(default = "default_feed_timeout", with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// Largest response body read from the feed
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    pub bucket: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub fan_out: bool,
    /// Write a marker object whenever a poll finds nothing new
    #[serde(default)]
    pub heartbeat: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
        }
    }
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_feed_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

fn default_max_response_bytes() -> u64 {
    DEFAULT_MAX_RESPONSE_BYTES
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Read, normalize and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        blank_to_none(&mut self.feed.api_key);
        blank_to_none(&mut self.feed.client_id);
        blank_to_none(&mut self.archive.region);
        blank_to_none(&mut self.archive.endpoint);
        blank_to_none(&mut self.archive.prefix);
        self.checkpoint.path = expand_home(&self.checkpoint.path);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.endpoint.trim().is_empty() {
            return Err(invalid("feed.endpoint must not be empty"));
        }
        if self.feed.page_size == 0 || self.feed.page_size > MAX_PAGE_SIZE {
            return Err(invalid(format!(
                "feed.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.feed.page_size
            )));
        }
        if self.feed.max_response_bytes == 0 {
            return Err(invalid("feed.max_response_bytes must be greater than zero"));
        }
        if self.archive.bucket.trim().is_empty() {
            return Err(invalid("archive.bucket must not be empty"));
        }
        for segment in self.archive.base_path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || !segment.chars().all(is_safe_key_char) {
                return Err(invalid(format!(
                    "archive.base_path segment {:?} may only contain letters, digits, '.', '-', '_'",
                    segment
                )));
            }
        }
        if let Some(prefix) = &self.archive.prefix {
            if !prefix.chars().all(is_safe_key_char) {
                return Err(invalid(format!(
                    "archive.prefix {:?} may only contain letters, digits, '.', '-', '_'",
                    prefix
                )));
            }
        }
        if self.checkpoint.path.as_os_str().is_empty() {
            return Err(invalid("checkpoint.path must not be empty"));
        }
        if self.poll.interval.is_zero() {
            return Err(invalid("poll.interval must be greater than zero"));
        }
        Ok(())
    }
}

impl ArchiveConfig {
    pub fn key_layout(&self) -> KeyLayout {
        KeyLayout::new(&self.base_path, self.prefix.as_deref())
    }

    pub fn match_mode(&self) -> MatchMode {
        if self.fan_out {
            MatchMode::FanOut
        } else {
            MatchMode::Flat
        }
    }
}

fn is_safe_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
