//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the deployment pipeline and the remote
//! services it drives. Production adapters live in `adapter::outbound`;
//! scripted doubles live in `testkit`.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  (pipeline stages)      │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                 │               │                     │
//!     ▼                 ▼               ▼                     ▼
//! ┌─────────┐     ┌──────────┐    ┌──────────┐        ┌──────────────┐
//! │ Wallet  │     │  Probe   │    │  Ledger  │        │ Private state│
//! └─────────┘     └──────────┘    └──────────┘        └──────────────┘
//! ```

pub mod outbound;

pub use outbound::ledger::{DeployRequest, LedgerClient, SubmitOutcome, TxStatus};
pub use outbound::private_state::{PrivateStateEntry, PrivateStateStore};
pub use outbound::probe::EndpointProbe;
pub use outbound::progress::{NullReporter, ProgressEvent, ProgressReporter, TracingReporter};
pub use outbound::wallet::WalletConnection;
