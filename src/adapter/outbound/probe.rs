//! Network reachability probes.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::SinkExt;
use reqwest::Client as HttpClient;
use tracing::debug;
use url::Url;

use super::http;
use crate::domain::EndpointKind;
use crate::error::{Error, Result};
use crate::port::EndpointProbe;

/// Probes HTTP endpoints with a GET and stream endpoints with a WebSocket
/// handshake.
///
/// Any HTTP response counts as reachable, error statuses included: the
/// question is whether something answers, not whether this path exists.
pub struct NetworkProbe {
    http: HttpClient,
    timeout: Duration,
}

impl NetworkProbe {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: http::client(timeout),
            timeout,
        }
    }

    async fn probe_http(&self, url: &Url) -> Result<()> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!(url = %url, status = %response.status(), "HTTP endpoint answered");
        Ok(())
    }

    async fn probe_stream(&self, url: &Url) -> Result<()> {
        let (mut stream, _) = tokio::time::timeout(
            self.timeout,
            tokio_tungstenite::connect_async(url.as_str()),
        )
        .await
        .map_err(|_| Error::Connection(format!("handshake timed out after {:?}", self.timeout)))?
        .map_err(|e| Error::Connection(e.to_string()))?;

        if let Err(e) = SinkExt::close(&mut stream).await {
            debug!(url = %url, error = %e, "Stream close after probe failed");
        }
        debug!(url = %url, "Stream endpoint accepted handshake");
        Ok(())
    }
}

#[async_trait]
impl EndpointProbe for NetworkProbe {
    async fn probe(&self, kind: EndpointKind, url: &Url) -> Result<()> {
        if kind.is_stream() {
            self.probe_stream(url).await
        } else {
            self.probe_http(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_http_endpoint_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = NetworkProbe::new(Duration::from_millis(500));
        let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
        let err = probe.probe(EndpointKind::Node, &url).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn refused_stream_endpoint_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = NetworkProbe::new(Duration::from_millis(500));
        let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).unwrap();
        let err = probe.probe(EndpointKind::IndexerWs, &url).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }
}
