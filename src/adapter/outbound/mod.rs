//! Outbound adapters (driven side).

mod http;

pub mod ledger;
pub mod private_state;
pub mod probe;
pub mod wallet;

pub use ledger::HttpLedgerClient;
pub use private_state::{FilePrivateStateStore, MemoryPrivateStateStore};
pub use probe::NetworkProbe;
pub use wallet::HttpWalletConnection;
