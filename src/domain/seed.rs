//! Wallet seed parsing.

use std::fmt;

use crate::error::PipelineError;

/// Number of hex characters in a seed (32 bytes).
pub const SEED_HEX_LEN: usize = 64;

/// Seed of the pre-funded genesis wallet on a local development network.
pub const GENESIS_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000001";

/// A validated 32-byte wallet seed.
///
/// `Debug` output is redacted so a seed never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Parse a seed from its hex form.
    ///
    /// Surrounding whitespace is ignored; anything else that is not exactly
    /// [`SEED_HEX_LEN`] hex digits is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidSeed`] naming the first problem found.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let raw = raw.trim();

        if let Some((position, ch)) = raw.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(PipelineError::InvalidSeed {
                reason: format!("non-hex character {ch:?} at position {position}"),
            });
        }
        if raw.len() != SEED_HEX_LEN {
            return Err(PipelineError::InvalidSeed {
                reason: format!(
                    "expected {SEED_HEX_LEN} hex characters, got {}",
                    raw.len()
                ),
            });
        }

        let mut bytes = [0u8; 32];
        for (byte, pair) in bytes.iter_mut().zip(raw.as_bytes().chunks_exact(2)) {
            *byte = (nibble(pair[0]) << 4) | nibble(pair[1]);
        }
        Ok(Self(bytes))
    }

    /// Raw seed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// Input is already checked to be an ASCII hex digit.
fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}
