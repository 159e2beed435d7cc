//! HTTP wallet connection backed by the funding source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::http;
use crate::domain::{Address, Balance};
use crate::error::{Error, Result};
use crate::port::WalletConnection;

/// Wallet connection that reads balances from `GET {funding}/balance/{address}`.
pub struct HttpWalletConnection {
    http: HttpClient,
    funding: Url,
    closed: AtomicBool,
}

impl HttpWalletConnection {
    #[must_use]
    pub fn new(funding: Url, request_timeout: Duration) -> Self {
        Self {
            http: http::client(request_timeout),
            funding,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn funding_url(&self) -> &Url {
        &self.funding
    }
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Amount,
}

/// Balances beyond `u64` arrive as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(u64),
    Text(String),
}

impl Amount {
    fn value(self) -> Result<Balance> {
        match self {
            Self::Number(n) => Ok(Balance::from(n)),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::Protocol(format!("invalid balance '{s}': {e}"))),
        }
    }
}

#[async_trait]
impl WalletConnection for HttpWalletConnection {
    async fn balance(&self, address: &Address) -> Result<Balance> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Connection("wallet connection closed".into()));
        }

        let url = http::endpoint_url(&self.funding, &["balance", address.as_str()])?;
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        let body: BalanceResponse = response.json().await?;
        let balance = body.balance.value()?;
        debug!(address = %address, balance = %balance, "Balance fetched");
        Ok(balance)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
