// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed credential providers

use fv_core::FeedConfig;
use std::io::{BufRead, IsTerminal, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0}")]
    Missing(String),
    #[error("failed to read credential: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the bearer credential for feed requests
pub trait CredentialProvider: Send + Sync + 'static {
    fn credential(&self) -> Result<String, CredentialError>;
}

/// A fixed credential
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticCredential(<redacted>)")
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Result<String, CredentialError> {
        if self.0.trim().is_empty() {
            return Err(CredentialError::Missing("credential is empty".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Reads the credential from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    fn credential(&self) -> Result<String, CredentialError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(CredentialError::Missing(format!("{} is not set", self.var))),
        }
    }
}

/// Asks on the terminal; refuses when stdin is not interactive
#[derive(Debug, Clone, Default)]
pub struct PromptCredential;

impl CredentialProvider for PromptCredential {
    fn credential(&self) -> Result<String, CredentialError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(CredentialError::Missing(
                "stdin is not a terminal, cannot prompt for API key".to_string(),
            ));
        }
        let mut stderr = std::io::stderr();
        write!(stderr, "Please enter your feed API key: ")?;
        stderr.flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let value = line.trim().to_string();
        if value.is_empty() {
            return Err(CredentialError::Missing("no API key entered".to_string()));
        }
        Ok(value)
    }
}

/// Tries each provider in order and returns the first credential found
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: impl CredentialProvider) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Environment variable, then config file, then an interactive prompt
    pub fn for_feed(config: &FeedConfig) -> Self {
        let mut chain = Self::new().with(EnvCredential::new(&config.api_key_env));
        if let Some(key) = &config.api_key {
            chain = chain.with(StaticCredential::new(key.clone()));
        }
        chain.with(PromptCredential)
    }

    /// Resolve once so later requests never block on a prompt
    pub fn resolve(&self) -> Result<StaticCredential, CredentialError> {
        self.credential().map(StaticCredential::new)
    }
}

impl Default for CredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for CredentialChain {
    fn credential(&self) -> Result<String, CredentialError> {
        let mut reasons = Vec::new();
        for provider in &self.providers {
            match provider.credential() {
                Ok(value) => return Ok(value),
                Err(e) => reasons.push(e.to_string()),
            }
        }
        Err(CredentialError::Missing(if reasons.is_empty() {
            "no credential providers configured".to_string()
        } else {
            reasons.join("; ")
        }))
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
