//! Content fingerprints used as memoization keys.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest identifying the content of a dataset or record subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of a byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Starts an incremental fingerprint.
    pub fn builder() -> FingerprintBuilder {
        FingerprintBuilder {
            hasher: Sha256::new(),
        }
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight bytes as lowercase hex, for log lines.
    pub fn short(&self) -> String {
        self.0[..8].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Incremental fingerprint builder.
pub struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    /// Feeds a field followed by a unit separator.
    pub fn field(mut self, bytes: &[u8]) -> Self {
        self.hasher.update(bytes);
        self.hasher.update([0x1f]);
        self
    }

    /// Finishes the digest.
    pub fn finish(self) -> Fingerprint {
        Fingerprint(self.hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(Fingerprint::of_bytes(b"abc"), Fingerprint::of_bytes(b"abc"));
        assert_ne!(Fingerprint::of_bytes(b"abc"), Fingerprint::of_bytes(b"abd"));
    }

    #[test]
    fn test_builder_field_boundaries() {
        let a = Fingerprint::builder().field(b"ab").field(b"c").finish();
        let b = Fingerprint::builder().field(b"a").field(b"bc").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_is_hex() {
        let fp = Fingerprint::of_bytes(b"");
        let hex = fp.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("e3b0c442"));
        assert_eq!(fp.short(), "e3b0c44298fc1c14");
    }
}
