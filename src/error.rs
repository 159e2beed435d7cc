use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::endpoint::EndpointKind;
use crate::domain::lifecycle::LifecycleState;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures of the deployment pipeline.
///
/// Each variant maps to one failure class an operator has to reason about
/// differently. `DeploymentRejected` means the provisioning transaction
/// definitely did not happen. `DeploymentUnconfirmed` means its outcome is
/// unknown and absence must not be assumed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid seed: {reason}")]
    InvalidSeed { reason: String },

    #[error("funding timed out after {waited:?} for {address} (last balance {last_balance})")]
    FundingTimeout {
        address: String,
        waited: Duration,
        last_balance: u128,
    },

    #[error("funding source unavailable after {attempts} attempts: {reason}")]
    FundingSourceUnavailable { attempts: u32, reason: String },

    #[error("endpoint {endpoint} unreachable at {url}: {reason}")]
    EndpointUnreachable {
        endpoint: EndpointKind,
        url: String,
        reason: String,
    },

    #[error("deployment rejected: {reason}")]
    DeploymentRejected { reason: String },

    #[error("deployment unconfirmed (tx {}): {reason}", tx_id.as_deref().unwrap_or("unknown"))]
    DeploymentUnconfirmed {
        tx_id: Option<String>,
        reason: String,
    },

    #[error("failed to record deployment of {address} at {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted while {stage}")]
    Interrupted { stage: LifecycleState },
}

impl PipelineError {
    /// Stable name of the failure class, used in failure summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSeed { .. } => "InvalidSeedError",
            Self::FundingTimeout { .. } => "FundingTimeoutError",
            Self::FundingSourceUnavailable { .. } => "FundingSourceUnavailableError",
            Self::EndpointUnreachable { .. } => "EndpointUnreachableError",
            Self::DeploymentRejected { .. } => "DeploymentRejectedError",
            Self::DeploymentUnconfirmed { .. } => "DeploymentUnconfirmedError",
            Self::Persistence { .. } => "PersistenceError",
            Self::Interrupted { .. } => "InterruptedError",
        }
    }
}

#[derive(Error, Debug)]
#[error("illegal lifecycle transition {from} -> {to}")]
pub struct LifecycleError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Stable name of the error class for human-readable summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Pipeline(e) => e.kind(),
            Self::Lifecycle(_) => "LifecycleError",
            Self::WebSocket(_) | Self::Http(_) | Self::Connection(_) => "ConnectionError",
            Self::Json(_) | Self::Protocol(_) => "ProtocolError",
            Self::Io(_) => "IoError",
            Self::Url(_) => "UrlError",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
