// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint commands

use super::load_config;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use fv_core::ContinuationToken;
use fv_storage::{CheckpointStore, FileCheckpointStore};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct CheckpointArgs {
    #[command(subcommand)]
    pub command: CheckpointCommand,
}

#[derive(Subcommand)]
pub enum CheckpointCommand {
    /// Print the stored continuation token
    Show {
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Replace the stored continuation token
    Set {
        /// Token to resume after
        token: String,
    },
    /// Delete the checkpoint so the next run starts from the beginning
    Clear,
}

#[derive(Serialize)]
struct CheckpointInfo {
    path: PathBuf,
    checkpoint: Option<String>,
}

impl fmt::Display for CheckpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.checkpoint {
            Some(token) => write!(f, "{}", token),
            None => write!(f, "No checkpoint"),
        }
    }
}

pub fn handle(config_path: &Path, command: CheckpointCommand) -> Result<()> {
    let config = load_config(config_path)?;
    let store = FileCheckpointStore::open(config.checkpoint.path)?;

    match command {
        CheckpointCommand::Show { output } => {
            let info = CheckpointInfo {
                path: store.path().to_path_buf(),
                checkpoint: store.load()?.map(ContinuationToken::into_inner),
            };
            output::print(&info, output);
        }
        CheckpointCommand::Set { token } => {
            if token.trim().is_empty() {
                bail!("checkpoint token must not be empty");
            }
            store.save(&ContinuationToken::new(token))?;
            println!("Checkpoint set");
        }
        CheckpointCommand::Clear => {
            store.clear()?;
            println!("Checkpoint cleared");
        }
    }

    Ok(())
}
