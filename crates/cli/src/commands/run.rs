// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run command: the long-lived replication loop

use super::load_config;
use anyhow::{Context, Result};
use fv_adapters::{
    CredentialChain, GraphQlFeedAdapter, S3ArchiveAdapter, StaticCredential,
    TracedArchiveAdapter, TracedFeedAdapter,
};
use fv_core::SystemClock;
use fv_engine::{Replicator, ReplicatorConfig, ReplicatorDeps};
use fv_storage::FileCheckpointStore;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::info;

#[derive(clap::Args)]
pub struct RunArgs {
    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// SIGINT and SIGTERM listeners
///
/// Installed before any startup work so an interrupt at the credential
/// prompt is handled like one during replication.
pub struct Shutdown {
    sigint: Signal,
    sigterm: Signal,
}

impl Shutdown {
    pub fn install() -> Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for either signal and describe it
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "interrupted",
            _ = self.sigterm.recv() => "terminated",
        }
    }
}

/// Resolve the credential off the runtime; `None` when a signal arrives first
async fn resolve_credential(
    chain: CredentialChain,
    shutdown: &mut Shutdown,
) -> Result<Option<StaticCredential>> {
    let lookup = tokio::task::spawn_blocking(move || chain.resolve());
    tokio::select! {
        resolved = lookup => {
            let credential = resolved
                .context("credential lookup panicked")?
                .context("no feed API key available")?;
            Ok(Some(credential))
        }
        reason = shutdown.recv() => {
            info!("{}, shutting down", reason);
            Ok(None)
        }
    }
}

pub async fn handle(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let mut shutdown = Shutdown::install()?;

    // Resolved before the loop starts so a prompt never interrupts it
    let Some(credential) =
        resolve_credential(CredentialChain::for_feed(&config.feed), &mut shutdown).await?
    else {
        return Ok(());
    };

    let feed = TracedFeedAdapter::new(GraphQlFeedAdapter::new(&config.feed, credential));
    let archive = TracedArchiveAdapter::new(S3ArchiveAdapter::new(&config.archive).await);
    let checkpoints = FileCheckpointStore::open(config.checkpoint.path.clone())?;

    info!(
        endpoint = %config.feed.endpoint,
        bucket = %config.archive.bucket,
        base_path = %config.archive.base_path,
        checkpoint = %checkpoints.path().display(),
        "starting feedvault"
    );

    let mut replicator = Replicator::new(
        ReplicatorDeps {
            feed,
            archive,
            checkpoints,
        },
        SystemClock,
        ReplicatorConfig::from_config(&config),
    );

    // Checkpoint saves are atomic, so dropping the loop mid-step is safe.
    // A fetch still blocking a pool thread is abandoned by the caller's
    // background runtime shutdown.
    tokio::select! {
        _ = replicator.run() => {}
        reason = shutdown.recv() => info!("{}, shutting down", reason),
    }

    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
