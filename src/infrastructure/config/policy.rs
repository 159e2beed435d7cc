//! Retry and timeout configuration for each pipeline stage.

use std::time::Duration;

use serde::Deserialize;

use crate::application::{ConfirmationPolicy, FundingPolicy, ProbePolicy};

/// Funding poll configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FundingConfig {
    /// Give up waiting for funds after this many seconds.
    #[serde(default = "default_funding_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay after the first poll (milliseconds).
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    /// Maximum delay between polls (milliseconds).
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    /// Multiplier applied to the delay after each poll.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Consecutive failed queries before the source is declared unavailable.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_funding_timeout_secs() -> u64 {
    300 // 5 minutes
}

fn default_initial_interval_ms() -> u64 {
    1000
}

fn default_max_interval_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_consecutive_failures() -> u32 {
    10
}

fn default_jitter() -> bool {
    true
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_funding_timeout_secs(),
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_consecutive_failures: default_max_consecutive_failures(),
            jitter: default_jitter(),
        }
    }
}

impl FundingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn policy(&self) -> FundingPolicy {
        FundingPolicy {
            initial_interval: Duration::from_millis(self.initial_interval_ms),
            max_interval: Duration::from_millis(self.max_interval_ms),
            multiplier: self.backoff_multiplier,
            max_consecutive_failures: self.max_consecutive_failures,
            jitter: self.jitter,
        }
    }
}

/// Endpoint probe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_attempts")]
    pub attempts: u32,
    /// Fixed delay between attempts (milliseconds).
    #[serde(default = "default_probe_delay_ms")]
    pub delay_ms: u64,
    /// Per-attempt timeout (milliseconds).
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_attempts() -> u32 {
    3
}

fn default_probe_delay_ms() -> u64 {
    500
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: default_probe_attempts(),
            delay_ms: default_probe_delay_ms(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn policy(&self) -> ProbePolicy {
        ProbePolicy {
            attempts: self.attempts,
            delay: Duration::from_millis(self.delay_ms),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Deployment submission and confirmation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    /// Interval between confirmation lookups (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Timeout for a single proof or submission request. Proving is slow.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_confirmation_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    90
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DeployConfig {
    #[must_use]
    pub fn policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            timeout: Duration::from_secs(self.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
