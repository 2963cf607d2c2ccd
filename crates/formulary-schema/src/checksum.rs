//! Checksum strings and the configurable strictness of their validation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Content checksum template for a variant artifact.
///
/// Stored unvalidated: in release pipelines this is a real SHA-256 hex
/// digest, while test fixtures use sentinel values (`dummy-digest`) or
/// placeholder tokens resolved at render time. Which forms are acceptable
/// is decided by the [`ChecksumPolicy`] applied at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Create a new `Checksum` without validation.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Compute the SHA-256 checksum of `data` as 64 lowercase hex characters.
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(hex::encode(digest))
    }

    /// Return the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Checksum {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How strictly checksum fields are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Require a canonical SHA-256 digest: exactly 64 ASCII hex characters.
    Strict,
    /// Require only a non-empty value. Accepts sentinel digests used by
    /// release-automation fixtures as well as placeholder tokens (default).
    #[default]
    Lenient,
}

/// Errors produced by [`ChecksumPolicy::check`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// The checksum string is empty.
    #[error("Checksum is empty")]
    Empty,

    /// The checksum is not exactly 64 characters long (strict policy).
    #[error("Invalid SHA256 length: expected 64 chars, got {0}")]
    InvalidLength(usize),

    /// The checksum contains non-hex characters (strict policy).
    #[error("Checksum contains non-hex characters: {0}")]
    NonHex(String),
}

impl ChecksumPolicy {
    /// Check `checksum` against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::Empty`] for an empty value under either
    /// policy. Under [`ChecksumPolicy::Strict`], additionally returns
    /// [`ChecksumError::InvalidLength`] or [`ChecksumError::NonHex`] when the
    /// value is not a canonical 64-hex-character digest.
    pub fn check(self, checksum: &Checksum) -> Result<(), ChecksumError> {
        let s = checksum.as_str();
        if s.is_empty() {
            return Err(ChecksumError::Empty);
        }
        if self == Self::Lenient {
            return Ok(());
        }

        if s.len() != 64 {
            return Err(ChecksumError::InvalidLength(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChecksumError::NonHex(s.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_is_canonical_hex() {
        let sum = Checksum::compute(b"hello world");
        assert_eq!(sum.as_str().len(), 64);
        assert!(ChecksumPolicy::Strict.check(&sum).is_ok());
    }

    #[test]
    fn compute_deterministic() {
        assert_eq!(Checksum::compute(b"data"), Checksum::compute(b"data"));
    }

    #[test]
    fn lenient_accepts_sentinel() {
        let sentinel = Checksum::new("dummy-digest");
        assert!(ChecksumPolicy::Lenient.check(&sentinel).is_ok());
    }

    #[test]
    fn strict_rejects_sentinel() {
        let sentinel = Checksum::new("dummy-digest");
        assert_eq!(
            ChecksumPolicy::Strict.check(&sentinel),
            Err(ChecksumError::InvalidLength(12))
        );
    }

    #[test]
    fn empty_is_rejected_under_both_policies() {
        let empty = Checksum::new("");
        assert_eq!(ChecksumPolicy::Lenient.check(&empty), Err(ChecksumError::Empty));
        assert_eq!(ChecksumPolicy::Strict.check(&empty), Err(ChecksumError::Empty));
    }

    #[test]
    fn strict_rejects_non_hex_of_right_length() {
        let sum = Checksum::new("z".repeat(64));
        assert!(matches!(
            ChecksumPolicy::Strict.check(&sum),
            Err(ChecksumError::NonHex(_))
        ));
    }
}
