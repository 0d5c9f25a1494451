// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake feed adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Edge, FeedAdapter, FeedError, FeedPage, Page};
use async_trait::async_trait;
use fv_core::{ContinuationToken, RawEventRecord};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCall {
    pub after: Option<ContinuationToken>,
}

#[derive(Default)]
struct FakeFeedState {
    responses: VecDeque<Result<FeedPage, FeedError>>,
    calls: Vec<FeedCall>,
}

/// Fake feed that replays scripted responses, then reports no data
#[derive(Clone, Default)]
pub struct FakeFeedAdapter {
    inner: Arc<Mutex<FakeFeedState>>,
}

impl FakeFeedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page built from `(cursor, record)` pairs
    pub fn push_page(&self, edges: Vec<(&str, RawEventRecord)>, has_next_page: bool) {
        let edges: Vec<Edge> = edges
            .into_iter()
            .map(|(cursor, record)| Edge {
                cursor: ContinuationToken::new(cursor),
                record,
            })
            .collect();
        let end_cursor = edges
            .last()
            .map(|e| e.cursor.clone())
            .unwrap_or_else(|| ContinuationToken::new("end"));
        self.push(Ok(FeedPage::Page(Page {
            edges,
            has_next_page,
            end_cursor,
        })));
    }

    pub fn push_no_data(&self) {
        self.push(Ok(FeedPage::NoData));
    }

    pub fn push_error(&self, error: FeedError) {
        self.push(Err(error));
    }

    pub fn push(&self, response: Result<FeedPage, FeedError>) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .responses
            .push_back(response);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<FeedCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .responses
            .len()
    }
}

#[async_trait]
impl FeedAdapter for FakeFeedAdapter {
    async fn fetch_page(&self, after: Option<&ContinuationToken>) -> Result<FeedPage, FeedError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(FeedCall {
            after: after.cloned(),
        });
        state.responses.pop_front().unwrap_or(Ok(FeedPage::NoData))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
