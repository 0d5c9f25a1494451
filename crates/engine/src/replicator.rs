// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The replication loop: poll the feed, archive each edge, checkpoint it
//!
//! The loop is a small state machine driven by [`Replicator::step`]. Every
//! failure is logged and retried after the configured delay; nothing is
//! skipped and the checkpoint never moves past an edge that is not fully
//! archived.

use crate::error::ReplicationError;
use bytes::Bytes;
use fv_adapters::{ArchiveAdapter, Edge, FeedAdapter, FeedPage, Page};
use fv_core::{
    ArchivalRecord, ArchiveKey, Clock, Config, ContinuationToken, RetryPolicy, Transformer,
};
use fv_storage::CheckpointStore;
use std::time::Duration;

/// Where the loop is between steps
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// Load the checkpoint and fetch the next page
    Polling,
    /// Archive and checkpoint every edge of a fetched page
    Draining(Page),
    /// Caught up: wait one poll interval
    Idle,
    /// A poll failed: wait, then poll again
    Retrying(Duration),
}

/// Loop tuning taken from the config file
#[derive(Debug, Clone)]
pub struct ReplicatorConfig {
    pub transformer: Transformer,
    pub retry: RetryPolicy,
    pub poll_interval: Duration,
    /// Write a marker object every idle cycle
    pub heartbeat: bool,
}

impl ReplicatorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            transformer: Transformer::new(
                config.archive.match_mode(),
                config.archive.key_layout(),
            ),
            retry: config.retry,
            poll_interval: config.poll.interval,
            heartbeat: config.archive.heartbeat,
        }
    }
}

/// Adapter dependencies of the loop
pub struct ReplicatorDeps<F, A, S> {
    pub feed: F,
    pub archive: A,
    pub checkpoints: S,
}

/// Replicates the feed into the archive, one edge at a time
pub struct Replicator<F, A, S, C: Clock> {
    feed: F,
    archive: A,
    checkpoints: S,
    clock: C,
    transformer: Transformer,
    retry: RetryPolicy,
    poll_interval: Duration,
    heartbeat: bool,
    /// Last cursor loaded or committed, reported in heartbeats
    checkpoint: Option<ContinuationToken>,
}

impl<F, A, S, C> Replicator<F, A, S, C>
where
    F: FeedAdapter,
    A: ArchiveAdapter,
    S: CheckpointStore,
    C: Clock,
{
    pub fn new(deps: ReplicatorDeps<F, A, S>, clock: C, config: ReplicatorConfig) -> Self {
        Self {
            feed: deps.feed,
            archive: deps.archive,
            checkpoints: deps.checkpoints,
            clock,
            transformer: config.transformer,
            retry: config.retry,
            poll_interval: config.poll_interval,
            heartbeat: config.heartbeat,
            checkpoint: None,
        }
    }

    /// Drive the loop forever. Stop it by dropping the future.
    pub async fn run(&mut self) {
        let mut state = LoopState::Polling;
        tracing::info!(
            mode = ?self.transformer.mode(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "replication started"
        );
        loop {
            state = self.step(state).await;
        }
    }

    /// Perform one transition and return the next state
    pub async fn step(&mut self, state: LoopState) -> LoopState {
        match state {
            LoopState::Polling => self.poll().await,
            LoopState::Draining(page) => self.drain(page).await,
            LoopState::Idle => {
                if self.heartbeat {
                    self.write_heartbeat().await;
                }
                tracing::debug!(
                    sleep_ms = self.poll_interval.as_millis() as u64,
                    "idle, waiting for new events"
                );
                self.clock.sleep(self.poll_interval).await;
                LoopState::Polling
            }
            LoopState::Retrying(delay) => {
                self.clock.sleep(delay).await;
                LoopState::Polling
            }
        }
    }

    async fn poll(&mut self) -> LoopState {
        match self.fetch().await {
            Ok(FeedPage::NoData) => {
                tracing::info!("no new events");
                LoopState::Idle
            }
            Ok(FeedPage::Page(page)) => LoopState::Draining(page),
            Err(e) => {
                let delay = self.retry.next_delay();
                tracing::error!(
                    error = %e,
                    retry_ms = delay.as_millis() as u64,
                    "poll failed, retrying"
                );
                LoopState::Retrying(delay)
            }
        }
    }

    async fn fetch(&mut self) -> Result<FeedPage, ReplicationError> {
        let checkpoint = self.checkpoints.load()?;
        let page = self.feed.fetch_page(checkpoint.as_ref()).await?;
        self.checkpoint = checkpoint;
        Ok(page)
    }

    async fn drain(&mut self, page: Page) -> LoopState {
        tracing::info!(
            edges = page.edges.len(),
            has_next_page = page.has_next_page,
            "archiving page"
        );

        if page.edges.is_empty() && page.has_next_page {
            // Re-polling would ask for the same page again
            tracing::warn!(end_cursor = %page.end_cursor, "empty page claims more data");
            return LoopState::Idle;
        }

        for edge in &page.edges {
            self.replicate_edge(edge).await;
        }

        if page.has_next_page {
            LoopState::Polling
        } else {
            LoopState::Idle
        }
    }

    /// Archive every record of an edge, then commit its cursor
    async fn replicate_edge(&mut self, edge: &Edge) {
        for record in self.transformer.transform(&edge.record) {
            self.archive_record(&record).await;
        }
        self.commit(&edge.cursor).await;
    }

    async fn archive_record(&self, record: &ArchivalRecord) {
        let mut attempt: u32 = 1;
        loop {
            match self.try_archive(record).await {
                Ok(_) => return,
                Err(e) => {
                    let delay = self.retry.next_delay();
                    tracing::error!(
                        id = record.id(),
                        attempt,
                        error = %e,
                        retry_ms = delay.as_millis() as u64,
                        "archive failed, retrying"
                    );
                    self.clock.sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    async fn try_archive(&self, record: &ArchivalRecord) -> Result<ArchiveKey, ReplicationError> {
        let object = self.transformer.prepare(record)?;
        let start = self.clock.now();
        self.archive
            .put(&object.key, Bytes::from(object.payload))
            .await?;
        tracing::debug!(
            key = %object.key,
            elapsed_ms = self.clock.now().duration_since(start).as_millis() as u64,
            "uploaded"
        );
        Ok(object.key)
    }

    async fn commit(&mut self, cursor: &ContinuationToken) {
        loop {
            match self.checkpoints.save(cursor) {
                Ok(()) => {
                    tracing::debug!(cursor = %cursor, "checkpoint saved");
                    self.checkpoint = Some(cursor.clone());
                    return;
                }
                Err(e) => {
                    let delay = self.retry.next_delay();
                    tracing::error!(
                        cursor = %cursor,
                        error = %ReplicationError::from(e),
                        retry_ms = delay.as_millis() as u64,
                        "checkpoint save failed, retrying"
                    );
                    self.clock.sleep(delay).await;
                }
            }
        }
    }

    /// Best effort: a failed heartbeat is logged and not retried
    async fn write_heartbeat(&self) {
        let key = self.transformer.layout().heartbeat_key();
        let body = serde_json::json!({
            "status": "no new events",
            "at": self.clock.utc_now().to_rfc3339(),
            "checkpoint": self.checkpoint.as_ref().map(ContinuationToken::as_str),
        });
        let payload = match serde_json::to_vec(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode heartbeat");
                return;
            }
        };
        if let Err(e) = self.archive.put(&key, Bytes::from(payload)).await {
            tracing::warn!(key = %key, error = %e, "heartbeat write failed");
        }
    }
}

#[cfg(test)]
#[path = "replicator_tests.rs"]
mod tests;
