//! Content hashes of stored payloads

use std::fmt::{self, Display, Formatter};

/// Blake3 hash of a serialized payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadHash([u8; 32]);

impl PayloadHash {
    /// Hash a payload
    #[inline]
    #[must_use]
    pub fn compute(payload: &str) -> Self {
        Self(*blake3::hash(payload.as_bytes()).as_bytes())
    }

    /// Raw bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 16 hex characters, for logs
    #[must_use]
    pub fn short(&self) -> String {
        self.0[..8].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Display for PayloadHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from(self.0).to_hex())
    }
}
