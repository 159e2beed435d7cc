//! Interrupt handling, the serving wait, and resource release.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::lifecycle::Lifecycle;
use crate::domain::LifecycleState;
use crate::error::Result;
use crate::port::{ProgressEvent, ProgressReporter, WalletConnection};

/// Owns the wallet connection and closes it at most once.
pub struct WalletGuard {
    wallet: Arc<dyn WalletConnection>,
    released: AtomicBool,
}

impl WalletGuard {
    pub fn new(wallet: Arc<dyn WalletConnection>) -> Self {
        Self {
            wallet,
            released: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn wallet(&self) -> Arc<dyn WalletConnection> {
        Arc::clone(&self.wallet)
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Close the connection. Returns `false` if it was already released.
    ///
    /// A failing close is logged; there is nothing left to retry it for.
    pub async fn release(&self) -> bool {
        if self.released.swap(true, Ordering::SeqCst) {
            return false;
        }
        match self.wallet.close().await {
            Ok(()) => info!("Wallet connection closed"),
            Err(e) => warn!(error = %e, "Failed to close wallet connection"),
        }
        true
    }
}

/// Coordinates cancellation and teardown for a run.
pub struct ShutdownController {
    cancel: CancellationToken,
    lifecycle: Lifecycle,
    wallet: WalletGuard,
    reporter: Arc<dyn ProgressReporter>,
    signal_installed: AtomicBool,
}

impl ShutdownController {
    pub fn new(wallet: Arc<dyn WalletConnection>, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self {
            cancel: CancellationToken::new(),
            lifecycle: Lifecycle::new(),
            wallet: WalletGuard::new(wallet),
            reporter,
            signal_installed: AtomicBool::new(false),
        }
    }

    /// Handle to the run's cancellation token.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub fn wallet(&self) -> &WalletGuard {
        &self.wallet
    }

    /// Cancel the run as if an interrupt had arrived.
    pub fn interrupt(&self) {
        self.cancel.cancel();
    }

    /// Cancel the token on Ctrl+C or SIGTERM.
    ///
    /// Installs at most one handler per controller; later calls return
    /// `false` and do nothing. Must be called from within a tokio runtime.
    pub fn install_signal_handler(&self) -> bool {
        if self.signal_installed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown_signal() => {
                    info!("Interrupt received, cancelling");
                    cancel.cancel();
                }
                () = cancel.cancelled() => {}
            }
        });
        true
    }

    /// Enter `Serving` and wait for an interrupt.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error if the run has already failed or moved
    /// past `Serving`.
    pub async fn serve(&self) -> Result<()> {
        self.lifecycle.advance(LifecycleState::Serving)?;
        self.reporter.report(ProgressEvent::StageEntered {
            stage: LifecycleState::Serving,
        });
        info!("Serving; press Ctrl+C to stop");
        self.cancel.cancelled().await;
        Ok(())
    }

    /// Orderly teardown after serving.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error if called from a state that cannot move
    /// to `ShuttingDown`. The wallet is released regardless.
    pub async fn shutdown(&self) -> Result<()> {
        let transition = self.lifecycle.advance(LifecycleState::ShuttingDown);
        if transition.is_ok() {
            self.reporter.report(ProgressEvent::StageEntered {
                stage: LifecycleState::ShuttingDown,
            });
        }
        self.release().await;
        transition.map_err(Into::into)
    }

    /// Teardown after a failure: mark the run failed and release the wallet.
    pub async fn abort(&self) {
        self.lifecycle.fail();
        self.release().await;
    }

    async fn release(&self) {
        if self.wallet.release().await {
            self.reporter.report(ProgressEvent::ShutdownCompleted);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{RecordingReporter, ScriptedWallet};

    #[tokio::test]
    async fn release_closes_once() {
        let wallet = Arc::new(ScriptedWallet::always(0));
        let guard = WalletGuard::new(wallet.clone());

        assert!(guard.release().await);
        assert!(!guard.release().await);
        assert!(guard.is_released());
        assert_eq!(wallet.close_calls(), 1);
    }

    #[tokio::test]
    async fn signal_handler_installs_once() {
        let controller = ShutdownController::new(
            Arc::new(ScriptedWallet::always(0)),
            Arc::new(RecordingReporter::new()),
        );
        assert!(controller.install_signal_handler());
        assert!(!controller.install_signal_handler());
        controller.interrupt();
    }

    #[tokio::test]
    async fn abort_marks_failed_and_releases() {
        let wallet = Arc::new(ScriptedWallet::always(0));
        let reporter = Arc::new(RecordingReporter::new());
        let controller = ShutdownController::new(wallet.clone(), reporter.clone());
        controller.lifecycle().advance(LifecycleState::Deploying).unwrap();

        controller.abort().await;
        controller.abort().await;

        assert_eq!(controller.lifecycle().current(), LifecycleState::Failed);
        assert_eq!(wallet.close_calls(), 1);
        assert_eq!(
            reporter
                .events()
                .iter()
                .filter(|e| matches!(e, ProgressEvent::ShutdownCompleted))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn serve_refuses_after_failure() {
        let controller = ShutdownController::new(
            Arc::new(ScriptedWallet::always(0)),
            Arc::new(RecordingReporter::new()),
        );
        controller.lifecycle().fail();
        assert!(controller.serve().await.is_err());
    }
}
