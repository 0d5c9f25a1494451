// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-delay retry policy with optional jitter

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between attempts. Failures are retried forever; only the pause
/// between attempts is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(with = "humantime_serde", default = "default_delay")]
    pub delay: Duration,
    /// Upper bound of a uniformly random extra delay
    #[serde(with = "humantime_serde", default)]
    pub jitter: Duration,
}

fn default_delay() -> Duration {
    Duration::from_secs(5)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            jitter: Duration::ZERO,
        }
    }

    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let extra_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        self.delay + Duration::from_millis(extra_ms)
    }
}
