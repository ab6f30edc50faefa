//! Cache key derivation.
//!
//! Keys are `<namespace>:<sha256 hex>` where the digest covers every input
//! that affects the cached result. Each part is length-prefixed before
//! hashing, so `["ab", "c"]` and `["a", "bc"]` never share a key.

use std::fmt;

use sha2::{Digest, Sha256};

/// Deterministic, collision-resistant cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from a namespace and the ordered producer inputs.
    pub fn derive<I, P>(namespace: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            let part = part.as_ref();
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(format!("{}:{:x}", namespace, hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
