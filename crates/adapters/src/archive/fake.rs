// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake archive adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ArchiveAdapter, ArchiveError};
use async_trait::async_trait;
use bytes::Bytes;
use fv_core::ArchiveKey;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded put attempt, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCall {
    pub key: ArchiveKey,
    pub payload: Bytes,
    pub succeeded: bool,
}

#[derive(Default)]
struct FakeArchiveState {
    objects: BTreeMap<ArchiveKey, Bytes>,
    calls: Vec<ArchiveCall>,
    failures: VecDeque<ArchiveError>,
}

/// In-memory object store with scripted failures
#[derive(Clone, Default)]
pub struct FakeArchiveAdapter {
    inner: Arc<Mutex<FakeArchiveState>>,
}

impl FakeArchiveAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` puts with a backend error
    pub fn fail_next(&self, count: usize) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for i in 0..count {
            state
                .failures
                .push_back(ArchiveError::Backend(format!("injected failure {}", i + 1)));
        }
    }

    /// Fail the next put with the given error
    pub fn push_failure(&self, error: ArchiveError) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .push_back(error);
    }

    /// Snapshot of stored objects
    pub fn objects(&self) -> BTreeMap<ArchiveKey, Bytes> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .objects
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects()
            .into_iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ArchiveCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl ArchiveAdapter for FakeArchiveAdapter {
    async fn put(&self, key: &ArchiveKey, payload: Bytes) -> Result<(), ArchiveError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let failure = state.failures.pop_front();
        state.calls.push(ArchiveCall {
            key: key.clone(),
            payload: payload.clone(),
            succeeded: failure.is_none(),
        });
        if let Some(error) = failure {
            return Err(error);
        }
        state.objects.insert(key.clone(), payload);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
