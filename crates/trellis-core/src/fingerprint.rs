//! Content fingerprints for library sources

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of the source a library bundle was built from.
///
/// Lets a host tell whether a reload actually delivered different code.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Prefixed form, e.g. "sha256:abcdef..."
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_source_same_fingerprint() {
        let a = Fingerprint::from_bytes(b"[library]\nnamespace = \"mylib\"\n");
        let b = Fingerprint::from_bytes(b"[library]\nnamespace = \"mylib\"\n");
        assert_eq!(a, b);
        assert_ne!(a, Fingerprint::from_bytes(b"[library]\nnamespace = \"other\"\n"));
    }

    #[test]
    fn test_hex_forms() {
        let f = Fingerprint::from_bytes(b"x");
        assert_eq!(f.to_hex().len(), 64);
        assert!(f.to_prefixed_hex().starts_with("sha256:"));
        assert_eq!(f.to_string().len(), 16);
    }
}
