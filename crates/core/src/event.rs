// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed records and their archival form
//!
//! Known fields are typed; anything else the feed returns is kept in a
//! flattened map so archival never drops data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque pagination cursor handed out by the feed.
///
/// Stored verbatim; never parsed or rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything about an event except its rule matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub id: String,
    /// Timestamp exactly as the feed sent it
    pub action_time: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub source_port: Option<u16>,
    #[serde(default)]
    pub destination_port: Option<u16>,
    #[serde(default)]
    pub transport_protocol: Option<String>,
    #[serde(default)]
    pub application_protocol: Option<String>,
    /// Protocol-specific details (HTTP request/response, DNS, TLS)
    #[serde(default)]
    pub application_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rule/formula that fired for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaMatch {
    #[serde(default)]
    pub action: Option<MatchAction>,
    pub formula: Formula,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAction {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    /// Numeric or string depending on the feed version
    #[serde(default)]
    pub formula_id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<FormulaTag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaTag {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// One feed node as fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    #[serde(flatten)]
    pub body: EventBody,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formula_matches: Vec<FormulaMatch>,
}

impl RawEventRecord {
    pub fn id(&self) -> &str {
        &self.body.id
    }
}

/// How the matches of an event appear in its archived form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchPayload {
    /// Full match list inline
    #[serde(rename = "formulaMatches")]
    Inline(Vec<FormulaMatch>),
    /// One match per archived object; `None` for an event without matches
    #[serde(rename = "formulaMatch")]
    Single(Option<FormulaMatch>),
}

/// The unit written to the archive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchivalRecord {
    #[serde(flatten)]
    pub body: EventBody,
    #[serde(flatten)]
    pub matches: MatchPayload,
    /// Position of the embedded match within the source record (fan-out only)
    #[serde(skip)]
    pub match_index: Option<usize>,
}

impl ArchivalRecord {
    pub fn id(&self) -> &str {
        &self.body.id
    }

    /// Canonical payload bytes for the archive
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
