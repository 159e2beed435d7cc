//! Scripted [`WalletConnection`] for funding tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Address, Balance};
use crate::error::{Error, Result};
use crate::port::WalletConnection;

type Reply = std::result::Result<Balance, String>;

/// A wallet whose balance queries replay a script.
///
/// Each query pops the next reply. Once the script is exhausted the last
/// reply repeats, so `always(0)` never funds.
pub struct ScriptedWallet {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Reply>,
    latency: Duration,
    balance_calls: AtomicU32,
    close_calls: AtomicU32,
}

impl ScriptedWallet {
    pub fn script(replies: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(Ok(0)),
            latency: Duration::ZERO,
            balance_calls: AtomicU32::new(0),
            close_calls: AtomicU32::new(0),
        }
    }

    /// Reply with each balance in turn.
    pub fn balances(balances: impl IntoIterator<Item = Balance>) -> Self {
        Self::script(balances.into_iter().map(Ok).collect())
    }

    pub fn always(balance: Balance) -> Self {
        Self::script(vec![Ok(balance)])
    }

    /// Every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::script(vec![Err(message.to_string())])
    }

    /// Delay every balance reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn balance_calls(&self) -> u32 {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> u32 {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletConnection for ScriptedWallet {
    async fn balance(&self, _address: &Address) -> Result<Balance> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = {
            let next = self.script.lock().pop_front();
            let mut last = self.last.lock();
            if let Some(next) = next {
                *last = next;
            }
            last.clone()
        };
        reply.map_err(Error::Connection)
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
