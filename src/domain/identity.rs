//! Client identity derived from a seed.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::seed::Seed;

/// Spendable amount in the ledger's smallest unit.
pub type Balance = u128;

/// Domain separation tag mixed into address derivation.
const ADDRESS_DOMAIN: &[u8] = b"deployctl:address:v1";

/// Wallet address - newtype for type safety.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from an already-encoded string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Derive the address belonging to `seed`.
    ///
    /// The address is the lowercase hex SHA-256 digest of a fixed domain tag
    /// followed by the seed bytes, so the same seed always yields the same
    /// address.
    #[must_use]
    pub fn derive(seed: &Seed) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(ADDRESS_DOMAIN);
        hasher.update(seed.as_bytes());
        let digest = hasher.finalize();
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity owned by the orchestrator for the lifetime of a run.
///
/// The balance is whatever the most recent funding poll observed; it is
/// never refreshed implicitly.
#[derive(Debug, Clone)]
pub struct Identity {
    seed: Seed,
    address: Address,
    balance: Option<Balance>,
}

impl Identity {
    /// Derive an identity from a validated seed.
    #[must_use]
    pub fn from_seed(seed: Seed) -> Self {
        let address = Address::derive(&seed);
        Self {
            seed,
            address,
            balance: None,
        }
    }

    #[must_use]
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Balance confirmed by the last poll, if any poll succeeded.
    #[must_use]
    pub fn balance(&self) -> Option<Balance> {
        self.balance
    }

    /// Return this identity with an observed balance attached.
    #[must_use]
    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = Some(balance);
        self
    }
}
