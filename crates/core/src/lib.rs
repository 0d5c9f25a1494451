// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! fv-core: Core library for the feedvault replicator
//!
//! This crate provides:
//! - The feed record model and its archival form
//! - The event transformer and archive key derivation
//! - Clock and retry abstractions used by the replication loop
//! - The configuration struct

pub mod clock;
pub mod config;
pub mod event;
pub mod key;
pub mod retry;
pub mod transform;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ArchiveConfig, CheckpointConfig, Config, ConfigError, FeedConfig, PollConfig};
pub use event::{
    ArchivalRecord, ContinuationToken, EventBody, Formula, FormulaMatch, FormulaTag, MatchAction,
    MatchPayload, RawEventRecord,
};
pub use key::{encode_identifier, ArchiveKey, KeyError, KeyLayout};
pub use retry::RetryPolicy;
pub use transform::{MatchMode, PrepareError, PreparedObject, Transformer};
