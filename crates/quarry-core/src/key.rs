//! Cache key addressing.

use std::fmt;

/// A binary fingerprint addressing one cached value.
///
/// Keys are opaque to the client. On the wire a key appears as its lowercase
/// hexadecimal rendering, so equal byte sequences always address the same
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<u8>);

impl CacheKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        CacheKey(bytes.into())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering used in request paths.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&[u8]> for CacheKey {
    fn from(bytes: &[u8]) -> Self {
        CacheKey(bytes.to_vec())
    }
}

impl From<Vec<u8>> for CacheKey {
    fn from(bytes: Vec<u8>) -> Self {
        CacheKey(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for CacheKey {
    fn from(bytes: [u8; N]) -> Self {
        CacheKey(bytes.to_vec())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
