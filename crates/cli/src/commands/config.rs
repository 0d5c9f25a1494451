// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config commands

use super::load_config;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use fv_core::{Config, MatchMode};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Load and validate the config file, then print a summary
    Check {
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

#[derive(Serialize)]
struct ConfigSummary {
    endpoint: String,
    page_size: u32,
    credential: String,
    bucket: String,
    base_path: String,
    prefix: Option<String>,
    mode: MatchMode,
    heartbeat: bool,
    checkpoint: PathBuf,
    retry_delay_ms: u64,
    retry_jitter_ms: u64,
    poll_interval_ms: u64,
}

impl ConfigSummary {
    fn new(config: &Config) -> Self {
        let env_set = std::env::var(&config.feed.api_key_env)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        // Never print the key itself
        let credential = if env_set {
            format!("environment ({})", config.feed.api_key_env)
        } else if config.feed.api_key.is_some() {
            "config file".to_string()
        } else {
            "prompt".to_string()
        };

        Self {
            endpoint: config.feed.endpoint.clone(),
            page_size: config.feed.page_size,
            credential,
            bucket: config.archive.bucket.clone(),
            base_path: config.archive.key_layout().base_path().to_string(),
            prefix: config.archive.prefix.clone(),
            mode: config.archive.match_mode(),
            heartbeat: config.archive.heartbeat,
            checkpoint: config.checkpoint.path.clone(),
            retry_delay_ms: config.retry.delay.as_millis() as u64,
            retry_jitter_ms: config.retry.jitter.as_millis() as u64,
            poll_interval_ms: config.poll.interval.as_millis() as u64,
        }
    }
}

impl fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config OK")?;
        writeln!(f, "  Feed:       {} (page size {})", self.endpoint, self.page_size)?;
        writeln!(f, "  Credential: {}", self.credential)?;
        writeln!(f, "  Bucket:     {}", self.bucket)?;
        writeln!(f, "  Base path:  {}", self.base_path)?;
        writeln!(f, "  Prefix:     {}", self.prefix.as_deref().unwrap_or("-"))?;
        writeln!(f, "  Mode:       {:?}", self.mode)?;
        writeln!(f, "  Heartbeat:  {}", self.heartbeat)?;
        writeln!(f, "  Checkpoint: {}", self.checkpoint.display())?;
        writeln!(
            f,
            "  Retry:      {}ms (+ up to {}ms jitter)",
            self.retry_delay_ms, self.retry_jitter_ms
        )?;
        write!(f, "  Poll:       {}ms", self.poll_interval_ms)
    }
}

pub fn handle(config_path: &Path, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Check { output } => {
            let config = load_config(config_path)?;
            output::print(&ConfigSummary::new(&config), output);
        }
    }
    Ok(())
}
