// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object-storage archive adapters

mod s3;

pub use s3::{classify_put_failure, payload_checksum, S3ArchiveAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ArchiveCall, FakeArchiveAdapter};

use async_trait::async_trait;
use bytes::Bytes;
use fv_core::ArchiveKey;
use thiserror::Error;

/// Errors from archive writes. All of them are retried by the caller.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive rejected payload checksum: {0}")]
    Integrity(String),
    #[error("archive backend error: {0}")]
    Backend(String),
}

/// Adapter for the object-storage archive
///
/// `put` makes exactly one attempt. Writing the same key and payload twice
/// must leave the archive as a single write would.
#[async_trait]
pub trait ArchiveAdapter: Clone + Send + Sync + 'static {
    async fn put(&self, key: &ArchiveKey, payload: Bytes) -> Result<(), ArchiveError>;
}
