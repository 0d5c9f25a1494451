// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! feedvault - replicate the security event feed into object storage

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{checkpoint, config, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "feedvault",
    version,
    about = "feedvault - Archive a paginated event feed into S3"
)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "feedvault.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the replication loop
    Run(run::RunArgs),
    /// Inspect or change the stored checkpoint
    Checkpoint(checkpoint::CheckpointArgs),
    /// Configuration helpers
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Run(args) => args.log_file.clone(),
        _ => None,
    };
    let _log_guard = logging::init(log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Run(_) => run::handle(&cli.config).await,
            Commands::Checkpoint(args) => checkpoint::handle(&cli.config, args.command),
            Commands::Config(args) => config::handle(&cli.config, args.command),
        }
    });

    // A feed request or credential prompt may still be blocking a pool thread
    runtime.shutdown_background();
    result
}
