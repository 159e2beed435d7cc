//! Exponential backoff with a cap and optional jitter.

use std::time::Duration;

use rand::Rng;

use super::policy::FundingPolicy;

/// Delay generator for the funding poll loop.
#[derive(Debug, Clone)]
pub(crate) struct Backoff {
    current: Duration,
    max: Duration,
    multiplier: f64,
    jitter: bool,
}

impl Backoff {
    pub(crate) fn new(policy: &FundingPolicy) -> Self {
        let max = policy.max_interval.max(policy.initial_interval);
        Self {
            current: policy.initial_interval,
            max,
            multiplier: policy.multiplier.max(1.0),
            jitter: policy.jitter,
        }
    }

    /// Return the current delay and advance the internal state.
    ///
    /// The returned delay never exceeds the configured cap, jitter included.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let base = self.current;
        let delay = (base + self.jitter(base)).min(self.max);

        let next_secs = base.as_secs_f64() * self.multiplier;
        self.current = if next_secs >= self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(next_secs)
        };

        delay
    }

    /// Up to 20% of the base delay, to keep clients from polling in lockstep.
    fn jitter(&self, base: Duration) -> Duration {
        if !self.jitter {
            return Duration::ZERO;
        }
        let range_ms = (base.as_millis() as u64) / 5;
        if range_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=range_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(initial_ms: u64, max_ms: u64, multiplier: f64, jitter: bool) -> FundingPolicy {
        FundingPolicy {
            initial_interval: Duration::from_millis(initial_ms),
            max_interval: Duration::from_millis(max_ms),
            multiplier,
            jitter,
            ..FundingPolicy::default()
        }
    }

    #[test]
    fn doubles_until_cap() {
        let mut backoff = Backoff::new(&policy(1000, 30_000, 2.0, false));
        let delays: Vec<u64> = (0..7)
            .map(|_| backoff.next_delay().as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16_000, 30_000, 30_000]);
    }

    #[test]
    fn jitter_stays_within_cap() {
        let mut backoff = Backoff::new(&policy(1000, 1100, 2.0, true));
        for _ in 0..50 {
            let delay = backoff.next_delay();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(1100));
        }
    }

    #[test]
    fn fixed_policy_never_grows() {
        let mut backoff = Backoff::new(&FundingPolicy::fixed(Duration::from_secs(1)));
        for _ in 0..5 {
            assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        }
    }

    #[test]
    fn shrinking_multiplier_is_clamped() {
        let mut backoff = Backoff::new(&policy(500, 5000, 0.1, false));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }
}
