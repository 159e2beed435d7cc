//! Wallet inspection handlers.

pub mod address;
pub mod balance;
