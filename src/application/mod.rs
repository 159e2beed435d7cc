//! Application layer: the deployment pipeline and its stages.
//!
//! Stages run strictly in order, each consuming the previous stage's
//! output:
//!
//! ```text
//! WalletBootstrapper -> ProviderConfigurator -> ContractDeployer
//!     -> DeploymentRecorder -> ShutdownController (serve, release)
//! ```
//!
//! [`pipeline::Orchestrator`] wires them together and guarantees that the
//! wallet connection is released on every exit path.

mod backoff;
mod cancel;

pub mod bootstrap;
pub mod configure;
pub mod deploy;
pub mod lifecycle;
pub mod pipeline;
pub mod policy;
pub mod record;
pub mod shutdown;

pub use bootstrap::WalletBootstrapper;
pub use configure::{EndpointCheck, ProviderBundle, ProviderConfigurator};
pub use deploy::{ContractDeployer, ContractSpec};
pub use lifecycle::Lifecycle;
pub use pipeline::{Deployment, DeploymentPlan, Orchestrator, Policies, Services, StageFailure};
pub use policy::{ConfirmationPolicy, FundingPolicy, ProbePolicy};
pub use record::{DeploymentRecorder, ExistingManifestPolicy};
pub use shutdown::{ShutdownController, WalletGuard};
