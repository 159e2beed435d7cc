//! Shared HTTP plumbing for the remote service adapters.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::warn;
use url::Url;

use crate::error::{Error, Result};

/// Build a client with a whole-request timeout.
pub(super) fn client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// Append path segments to `base`, escaping each one.
///
/// Unlike [`Url::join`], a base path without a trailing slash keeps its
/// last segment.
pub(super) fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::Protocol(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_to_root() {
        let base = Url::parse("http://127.0.0.1:9944").unwrap();
        let url = endpoint_url(&base, &["transactions", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9944/transactions/abc");
    }

    #[test]
    fn keeps_existing_path() {
        let base = Url::parse("http://faucet.local/api/v1").unwrap();
        let url = endpoint_url(&base, &["balance", "02ab"]).unwrap();
        assert_eq!(url.as_str(), "http://faucet.local/api/v1/balance/02ab");

        let base = Url::parse("http://faucet.local/api/v1/").unwrap();
        let url = endpoint_url(&base, &["balance", "02ab"]).unwrap();
        assert_eq!(url.as_str(), "http://faucet.local/api/v1/balance/02ab");
    }

    #[test]
    fn escapes_segments() {
        let base = Url::parse("http://node.local").unwrap();
        let url = endpoint_url(&base, &["transactions", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://node.local/transactions/a%2Fb");
    }
}
