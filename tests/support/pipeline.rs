use std::sync::Arc;

use deployctl::application::{
    Orchestrator, Policies, ProviderBundle, ProviderConfigurator, Services,
};
use deployctl::domain::{Identity, Seed, GENESIS_SEED};
use deployctl::testkit::{
    contract, fast_policies, local_uris, MemoryPrivateStateStore, RecordingReporter,
    ScriptedLedger, ScriptedProbe, ScriptedWallet,
};
use tokio_util::sync::CancellationToken;

/// Doubles for every remote service, kept for assertions.
pub struct Doubles {
    pub wallet: Arc<ScriptedWallet>,
    pub probe: Arc<ScriptedProbe>,
    pub ledger: Arc<ScriptedLedger>,
    pub private_state: Arc<MemoryPrivateStateStore>,
    pub reporter: Arc<RecordingReporter>,
}

impl Doubles {
    pub fn new(wallet: ScriptedWallet, probe: ScriptedProbe, ledger: ScriptedLedger) -> Self {
        Self {
            wallet: Arc::new(wallet),
            probe: Arc::new(probe),
            ledger: Arc::new(ledger),
            private_state: Arc::new(MemoryPrivateStateStore::new()),
            reporter: Arc::new(RecordingReporter::new()),
        }
    }

    /// Funded wallet, reachable endpoints, ledger confirming at `address`.
    pub fn happy(address: &str) -> Self {
        Self::new(
            ScriptedWallet::always(1_000),
            ScriptedProbe::reachable(),
            ScriptedLedger::confirming(address),
        )
    }

    pub fn orchestrator(&self) -> Orchestrator {
        self.orchestrator_with(fast_policies())
    }

    pub fn orchestrator_with(&self, policies: Policies) -> Orchestrator {
        let services = Services {
            wallet: self.wallet.clone(),
            probe: self.probe.clone(),
            ledger: self.ledger.clone(),
            private_state: self.private_state.clone(),
            reporter: self.reporter.clone(),
        };
        Orchestrator::new(services, policies, contract())
    }
}

pub fn genesis_identity() -> Identity {
    Identity::from_seed(Seed::parse(GENESIS_SEED).expect("genesis seed parses"))
}

/// A bundle for the local endpoints, probed against an always-reachable
/// probe.
pub async fn local_bundle(private_state: Arc<MemoryPrivateStateStore>) -> ProviderBundle {
    let configurator = ProviderConfigurator::new(
        Arc::new(ScriptedProbe::reachable()),
        fast_policies().probe,
        Arc::new(RecordingReporter::new()),
    );
    configurator
        .configure(
            genesis_identity(),
            &local_uris(),
            private_state,
            &CancellationToken::new(),
        )
        .await
        .expect("local endpoints configure")
}
