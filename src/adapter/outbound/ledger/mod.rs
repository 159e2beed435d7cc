//! Proof server and ledger node adapter.

mod client;
mod dto;

pub use client::HttpLedgerClient;
