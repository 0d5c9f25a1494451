// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::archive::{ArchiveAdapter, ArchiveError};
use crate::feed::{FeedAdapter, FeedError, FeedPage};
use async_trait::async_trait;
use bytes::Bytes;
use fv_core::{ArchiveKey, ContinuationToken};
use tracing::Instrument;

/// Wrapper that adds tracing to any FeedAdapter
#[derive(Clone)]
pub struct TracedFeedAdapter<F> {
    inner: F,
}

impl<F> TracedFeedAdapter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F: FeedAdapter> FeedAdapter for TracedFeedAdapter<F> {
    async fn fetch_page(&self, after: Option<&ContinuationToken>) -> Result<FeedPage, FeedError> {
        let span = tracing::info_span!(
            "feed.fetch_page",
            after = after.map(ContinuationToken::as_str).unwrap_or("<start>")
        );

        async {
            tracing::debug!("fetching");
            let start = std::time::Instant::now();
            let result = self.inner.fetch_page(after).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(FeedPage::NoData) => tracing::debug!(elapsed_ms, "no data"),
                Ok(FeedPage::Page(page)) => tracing::info!(
                    elapsed_ms,
                    edges = page.edges.len(),
                    has_next_page = page.has_next_page,
                    "page fetched"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, auth = e.is_auth(), "fetch failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ArchiveAdapter
#[derive(Clone)]
pub struct TracedArchiveAdapter<A> {
    inner: A,
}

impl<A> TracedArchiveAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: ArchiveAdapter> ArchiveAdapter for TracedArchiveAdapter<A> {
    async fn put(&self, key: &ArchiveKey, payload: Bytes) -> Result<(), ArchiveError> {
        let span = tracing::info_span!("archive.put", key = %key, bytes = payload.len());

        async {
            let start = std::time::Instant::now();
            let result = self.inner.put(key, payload).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "stored"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "put failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
