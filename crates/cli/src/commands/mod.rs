// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod checkpoint;
pub mod config;
pub mod run;

use anyhow::{Context, Result};
use fv_core::Config;
use std::path::Path;

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("could not load {}", path.display()))
}
