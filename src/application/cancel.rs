//! Racing suspension points against the shutdown token.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::LifecycleState;
use crate::error::{PipelineError, Result};

/// Drive `fut` to completion unless `cancel` fires first.
///
/// Cancellation is checked first so an already-cancelled token wins even
/// when `fut` is immediately ready.
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    stage: LifecycleState,
    fut: F,
) -> Result<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(PipelineError::Interrupted { stage }.into()),
        output = fut => Ok(output),
    }
}

/// Sleep for `duration` unless `cancel` fires first.
pub(crate) async fn sleep(
    cancel: &CancellationToken,
    stage: LifecycleState,
    duration: Duration,
) -> Result<()> {
    until_cancelled(cancel, stage, tokio::time::sleep(duration)).await
}

/// Upper bound used when a configured timeout does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + timeout`, saturating to a far-future instant instead of
/// overflowing.
pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_pending_future() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let result = until_cancelled(
            &cancel,
            LifecycleState::Deploying,
            std::future::pending::<()>(),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::Pipeline(PipelineError::Interrupted {
                stage: LifecycleState::Deploying
            }))
        ));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_timeout_saturates_instead_of_overflowing() {
        let now = Instant::now();
        let deadline = deadline_after(now, Duration::from_secs(u64::MAX));
        assert!(deadline >= now + FAR_FUTURE);
        assert_eq!(deadline_after(now, Duration::from_secs(5)), now + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn completed_future_passes_through() {
        let cancel = CancellationToken::new();
        let value = until_cancelled(&cancel, LifecycleState::Idle, async { 7 })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_ready_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = until_cancelled(&cancel, LifecycleState::Idle, async { 7 }).await;
        assert!(result.is_err());
    }
}
