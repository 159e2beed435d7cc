//! Scripted [`LedgerClient`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::ServiceEndpointSet;
use crate::error::{Error, Result};
use crate::port::{DeployRequest, LedgerClient, SubmitOutcome, TxStatus};

/// Scripted result of a submission.
#[derive(Debug, Clone)]
pub enum ScriptedSubmit {
    /// Accepted with this transaction id.
    Accept(String),
    /// Explicitly rejected with this reason.
    Reject(String),
    /// Transport failure; outcome unknown.
    Fail(String),
}

type StatusReply = std::result::Result<TxStatus, String>;

/// A ledger with one scripted submission result and a status script.
///
/// Status lookups pop the next reply and repeat the last one once the
/// script is exhausted.
pub struct ScriptedLedger {
    submit: ScriptedSubmit,
    submit_latency: Duration,
    statuses: Mutex<VecDeque<StatusReply>>,
    last_status: Mutex<StatusReply>,
    requests: Mutex<Vec<DeployRequest>>,
    status_calls: AtomicU32,
}

impl ScriptedLedger {
    pub fn new(submit: ScriptedSubmit) -> Self {
        Self {
            submit,
            submit_latency: Duration::ZERO,
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(Ok(TxStatus::Pending)),
            requests: Mutex::new(Vec::new()),
            status_calls: AtomicU32::new(0),
        }
    }

    /// Accepts as `tx-1` and confirms at `address` on the first lookup.
    pub fn confirming(address: &str) -> Self {
        Self::new(ScriptedSubmit::Accept("tx-1".into())).with_statuses(vec![Ok(
            TxStatus::Confirmed {
                contract_address: address.to_string(),
                block_height: Some(1),
            },
        )])
    }

    pub fn with_statuses(self, statuses: Vec<StatusReply>) -> Self {
        *self.statuses.lock() = statuses.into();
        self
    }

    /// Delay the submission reply by `latency`.
    pub fn with_submit_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = latency;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<DeployRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn submit(
        &self,
        _endpoints: &ServiceEndpointSet,
        request: &DeployRequest,
    ) -> Result<SubmitOutcome> {
        self.requests.lock().push(request.clone());
        if !self.submit_latency.is_zero() {
            tokio::time::sleep(self.submit_latency).await;
        }
        match &self.submit {
            ScriptedSubmit::Accept(tx_id) => Ok(SubmitOutcome::Accepted {
                tx_id: tx_id.clone(),
            }),
            ScriptedSubmit::Reject(reason) => Ok(SubmitOutcome::Rejected {
                reason: reason.clone(),
            }),
            ScriptedSubmit::Fail(message) => Err(Error::Connection(message.clone())),
        }
    }

    async fn status(&self, _endpoints: &ServiceEndpointSet, _tx_id: &str) -> Result<TxStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let reply = {
            let next = self.statuses.lock().pop_front();
            let mut last = self.last_status.lock();
            if let Some(next) = next {
                *last = next;
            }
            last.clone()
        };
        reply.map_err(Error::Protocol)
    }
}
