//! Per-stage retry and timeout policies.
//!
//! Each stage retries differently: funding polls back off over a long
//! horizon, probes retry a few times with a short fixed delay, and the
//! provisioning submission is never retried at all. Keeping the policies
//! as values lets tests inject tiny timeouts.

use std::time::Duration;

/// Backoff shape for polling the funding source.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingPolicy {
    /// Delay after the first poll.
    pub initial_interval: Duration,
    /// Upper bound on any single delay, jitter included.
    pub max_interval: Duration,
    /// Multiplier applied to the delay after each poll.
    pub multiplier: f64,
    /// Consecutive failed queries before the source is declared unavailable.
    pub max_consecutive_failures: u32,
    /// Add up to 20% random jitter to each delay.
    pub jitter: bool,
}

impl Default for FundingPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            max_consecutive_failures: 10,
            jitter: true,
        }
    }
}

impl FundingPolicy {
    /// Fixed-interval polling without jitter.
    #[must_use]
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            max_interval: interval,
            multiplier: 1.0,
            jitter: false,
            ..Self::default()
        }
    }
}

/// Retry policy for endpoint reachability probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Total attempts per endpoint, including the first.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// How long to wait for a submitted transaction to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
        }
    }
}
