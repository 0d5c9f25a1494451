// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the replication loop

use fv_adapters::{ArchiveError, FeedError};
use fv_core::PrepareError;
use fv_storage::CheckpointError;
use thiserror::Error;

/// A failed step. The loop logs these and retries; none of them is fatal.
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("could not prepare record: {0}")]
    Prepare(#[from] PrepareError),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}
