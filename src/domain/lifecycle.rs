//! Process lifecycle states.

use std::fmt;

/// Lifecycle of a single orchestrator run.
///
/// Variants are declared in pipeline order; the derived `Ord` is what makes
/// transitions monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Idle,
    BuildingIdentity,
    AwaitingFunds,
    ConfiguringProviders,
    Deploying,
    Recording,
    Serving,
    ShuttingDown,
    Failed,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Forward moves are allowed, any non-failed state may fail, and
    /// nothing leaves `Failed`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Failed, _) => false,
            (_, Self::Failed) => true,
            _ => next > self,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::BuildingIdentity => "building identity",
            Self::AwaitingFunds => "awaiting funds",
            Self::ConfiguringProviders => "configuring providers",
            Self::Deploying => "deploying",
            Self::Recording => "recording",
            Self::Serving => "serving",
            Self::ShuttingDown => "shutting down",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
