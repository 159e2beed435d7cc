//! Scripted [`EndpointProbe`].

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::domain::EndpointKind;
use crate::error::{Error, Result};
use crate::port::EndpointProbe;

/// A probe that fails a configured number of times per endpoint, then
/// succeeds.
#[derive(Default)]
pub struct ScriptedProbe {
    failures: Mutex<HashMap<EndpointKind, u32>>,
    calls: Mutex<Vec<EndpointKind>>,
}

impl ScriptedProbe {
    /// Every endpoint answers.
    pub fn reachable() -> Self {
        Self::default()
    }

    /// Fail the first `times` probes of `kind`. `u32::MAX` never recovers.
    pub fn failing_first(self, kind: EndpointKind, times: u32) -> Self {
        self.failures.lock().insert(kind, times);
        self
    }

    pub fn unreachable(kind: EndpointKind) -> Self {
        Self::reachable().failing_first(kind, u32::MAX)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, kind: EndpointKind) -> usize {
        self.calls.lock().iter().filter(|k| **k == kind).count()
    }

    /// Endpoints probed, in order.
    pub fn calls(&self) -> Vec<EndpointKind> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl EndpointProbe for ScriptedProbe {
    async fn probe(&self, kind: EndpointKind, url: &Url) -> Result<()> {
        self.calls.lock().push(kind);
        let mut failures = self.failures.lock();
        match failures.get_mut(&kind) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(Error::Connection(format!("connection refused: {url}")))
            }
            _ => Ok(()),
        }
    }
}
