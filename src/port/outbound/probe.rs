//! Reachability probe port.

use async_trait::async_trait;
use url::Url;

use crate::domain::EndpointKind;
use crate::error::Result;

/// Lightweight check that a remote endpoint answers.
///
/// A single call makes a single attempt; retry policy belongs to the
/// caller.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    async fn probe(&self, kind: EndpointKind, url: &Url) -> Result<()>;
}
