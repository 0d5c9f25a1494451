// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event feed adapters

mod graphql;

pub use graphql::{parse_page, GraphQlFeedAdapter, EVENTS_QUERY};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFeedAdapter, FeedCall};

use crate::credential::CredentialError;
use async_trait::async_trait;
use fv_core::{ContinuationToken, RawEventRecord};
use thiserror::Error;

/// Errors from feed fetches. All of them are retried by the caller.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("no credential available: {0}")]
    Credential(#[from] CredentialError),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("feed reported errors: {0}")]
    GraphQl(String),
    #[error("malformed feed response: {0}")]
    Decode(String),
}

impl FeedError {
    pub fn is_auth(&self) -> bool {
        matches!(self, FeedError::Auth(_) | FeedError::Credential(_))
    }
}

/// One edge of a feed page
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub cursor: ContinuationToken,
    pub record: RawEventRecord,
}

/// A page that carried an end cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Oldest to newest
    pub edges: Vec<Edge>,
    pub has_next_page: bool,
    pub end_cursor: ContinuationToken,
}

/// Result of one poll of the feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPage {
    /// The response had no end cursor: nothing new this poll
    NoData,
    Page(Page),
}

impl FeedPage {
    pub fn edge_count(&self) -> usize {
        match self {
            FeedPage::NoData => 0,
            FeedPage::Page(page) => page.edges.len(),
        }
    }
}

/// Adapter for the paginated event feed
#[async_trait]
pub trait FeedAdapter: Clone + Send + Sync + 'static {
    /// Fetch the page following `after` (or the first page when `None`)
    async fn fetch_page(&self, after: Option<&ContinuationToken>) -> Result<FeedPage, FeedError>;
}
