// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive key derivation
//!
//! Layout: `<base>/YYYY/MM/DD/[<prefix>-]<encoded id>[-<match index>]`,
//! with the date taken from the event timestamp in UTC.

use crate::event::ArchivalRecord;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("unparseable timestamp {timestamp:?} on event {id}")]
    InvalidTimestamp { id: String, timestamp: String },
}

/// Object key under which an archival record is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveKey(String);

impl ArchiveKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where keys are rooted and how file names are prefixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    base_path: String,
    prefix: Option<String>,
}

impl KeyLayout {
    /// Normalizes `base_path` to either empty or `segment/.../` (no leading slash)
    pub fn new(base_path: &str, prefix: Option<&str>) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        let base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}/", trimmed)
        };
        let prefix = prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Self { base_path, prefix }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn key_for(&self, record: &ArchivalRecord) -> Result<ArchiveKey, KeyError> {
        let at = parse_timestamp(&record.body.action_time).ok_or_else(|| {
            KeyError::InvalidTimestamp {
                id: record.body.id.clone(),
                timestamp: record.body.action_time.clone(),
            }
        })?;

        let mut key = format!(
            "{}{:04}/{:02}/{:02}/",
            self.base_path,
            at.year(),
            at.month(),
            at.day()
        );
        if let Some(prefix) = &self.prefix {
            key.push_str(prefix);
            key.push('-');
        }
        key.push_str(&encode_identifier(&record.body.id));
        if let Some(index) = record.match_index {
            key.push('-');
            key.push_str(&index.to_string());
        }
        Ok(ArchiveKey(key))
    }

    /// Fixed key overwritten by idle heartbeats
    pub fn heartbeat_key(&self) -> ArchiveKey {
        let name = match &self.prefix {
            Some(prefix) => format!("{}-heartbeat.json", prefix),
            None => "heartbeat.json".to_string(),
        };
        ArchiveKey(format!("{}_heartbeat/{}", self.base_path, name))
    }
}

/// URL- and filesystem-safe encoding of an event identifier
pub fn encode_identifier(id: &str) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

/// Parse a feed timestamp into UTC.
///
/// RFC 3339 with any offset is converted; offset-less timestamps are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
