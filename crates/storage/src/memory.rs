// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory checkpoint store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::checkpoint::{CheckpointError, CheckpointStore};
use fv_core::ContinuationToken;
use std::sync::{Arc, Mutex};

/// Recorded checkpoint call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointCall {
    Load,
    Save(ContinuationToken),
    Clear,
}

#[derive(Default)]
struct MemoryState {
    current: Option<ContinuationToken>,
    calls: Vec<CheckpointCall>,
    failing_saves: usize,
    failing_loads: usize,
}

/// Checkpoint store that keeps the token in memory and records every call
#[derive(Clone, Default)]
pub struct MemoryCheckpointStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously committed checkpoint
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().current = Some(ContinuationToken::new(token));
        store
    }

    /// Make the next `count` saves fail
    pub fn fail_next_saves(&self, count: usize) {
        self.lock().failing_saves = count;
    }

    /// Make the next `count` loads fail
    pub fn fail_next_loads(&self, count: usize) {
        self.lock().failing_loads = count;
    }

    pub fn current(&self) -> Option<ContinuationToken> {
        self.lock().current.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CheckpointCall> {
        self.lock().calls.clone()
    }

    /// Tokens passed to successful and failed saves, in order
    pub fn saves(&self) -> Vec<ContinuationToken> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                CheckpointCall::Save(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self) -> Result<Option<ContinuationToken>, CheckpointError> {
        let mut state = self.lock();
        state.calls.push(CheckpointCall::Load);
        if state.failing_loads > 0 {
            state.failing_loads -= 1;
            return Err(CheckpointError::Unavailable("injected load failure".to_string()));
        }
        Ok(state.current.clone())
    }

    fn save(&self, token: &ContinuationToken) -> Result<(), CheckpointError> {
        let mut state = self.lock();
        state.calls.push(CheckpointCall::Save(token.clone()));
        if state.failing_saves > 0 {
            state.failing_saves -= 1;
            return Err(CheckpointError::Unavailable("injected save failure".to_string()));
        }
        state.current = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CheckpointError> {
        let mut state = self.lock();
        state.calls.push(CheckpointCall::Clear);
        state.current = None;
        Ok(())
    }
}
