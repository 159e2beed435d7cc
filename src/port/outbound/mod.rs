//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod ledger;
pub mod private_state;
pub mod probe;
pub mod progress;
pub mod wallet;
