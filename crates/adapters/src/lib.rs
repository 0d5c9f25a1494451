// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the event feed, the archive, credentials

pub mod archive;
pub mod credential;
pub mod feed;
pub mod traced;

pub use archive::{ArchiveAdapter, ArchiveError, S3ArchiveAdapter};
pub use credential::{
    CredentialChain, CredentialError, CredentialProvider, EnvCredential, PromptCredential,
    StaticCredential,
};
pub use feed::{Edge, FeedAdapter, FeedError, FeedPage, GraphQlFeedAdapter, Page};
pub use traced::{TracedArchiveAdapter, TracedFeedAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use archive::{ArchiveCall, FakeArchiveAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use feed::{FakeFeedAdapter, FeedCall};
