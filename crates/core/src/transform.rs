// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw feed record -> archival records

use crate::event::{ArchivalRecord, MatchPayload, RawEventRecord};
use crate::key::{ArchiveKey, KeyError, KeyLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How rule matches map onto archived objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// One object per event, all matches inline
    #[default]
    Flat,
    /// One object per match
    FanOut,
}

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("failed to encode event {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An archival record ready to hand to the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedObject {
    pub key: ArchiveKey,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Transformer {
    mode: MatchMode,
    layout: KeyLayout,
}

impl Transformer {
    pub fn new(mode: MatchMode, layout: KeyLayout) -> Self {
        Self { mode, layout }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Always yields at least one record: an event without matches is
    /// archived with an empty match field in either mode.
    pub fn transform(&self, record: &RawEventRecord) -> Vec<ArchivalRecord> {
        match self.mode {
            MatchMode::Flat => vec![ArchivalRecord {
                body: record.body.clone(),
                matches: MatchPayload::Inline(record.formula_matches.clone()),
                match_index: None,
            }],
            MatchMode::FanOut if record.formula_matches.is_empty() => vec![ArchivalRecord {
                body: record.body.clone(),
                matches: MatchPayload::Single(None),
                match_index: None,
            }],
            MatchMode::FanOut => record
                .formula_matches
                .iter()
                .enumerate()
                .map(|(index, m)| ArchivalRecord {
                    body: record.body.clone(),
                    matches: MatchPayload::Single(Some(m.clone())),
                    match_index: Some(index),
                })
                .collect(),
        }
    }

    pub fn key_for(&self, record: &ArchivalRecord) -> Result<ArchiveKey, KeyError> {
        self.layout.key_for(record)
    }

    /// Derive key and payload for one archival record
    pub fn prepare(&self, record: &ArchivalRecord) -> Result<PreparedObject, PrepareError> {
        let key = self.key_for(record)?;
        let payload = record.to_payload().map_err(|source| PrepareError::Encode {
            id: record.body.id.clone(),
            source,
        })?;
        Ok(PreparedObject { key, payload })
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
