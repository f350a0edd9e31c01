//! Evidence Hashing
//!
//! SHA-256 primitives shared by the commitment engine:
//! - Leaf and node digests for evidence Merkle trees
//! - Hex encoding at the display/storage boundary

use sha2::{Sha256, Digest};
use thiserror::Error;

/// Hash output type (256 bits / 32 bytes)
pub type EvidenceHash = [u8; 32];

/// Length of a digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute a plain SHA-256 hash of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> EvidenceHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute hash with a domain prefix.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> EvidenceHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the concatenation `prefix ∥ left ∥ right`.
///
/// `prefix` is empty for compatibility-mode trees.
pub fn hash_pair(prefix: &[u8], left: &EvidenceHash, right: &EvidenceHash) -> EvidenceHash {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Render a digest as lowercase hex.
pub fn to_hex(hash: &EvidenceHash) -> String {
    hex::encode(hash)
}

/// Errors when parsing a hex-encoded digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestParseError {
    /// Input is not 64 characters long.
    #[error("expected {DIGEST_HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),
    /// Input contains a non-hex character.
    #[error("invalid hex digest: {0}")]
    InvalidHex(String),
}

/// Parse a 64-character hex digest (case-insensitive).
pub fn parse_digest_hex(input: &str) -> Result<EvidenceHash, DigestParseError> {
    let trimmed = input.trim();
    if trimmed.len() != DIGEST_HEX_LEN {
        return Err(DigestParseError::InvalidLength(trimmed.len()));
    }

    let mut out = [0u8; 32];
    hex::decode_to_slice(trimmed, &mut out)
        .map_err(|e| DigestParseError::InvalidHex(e.to_string()))?;
    Ok(out)
}

/// Serde helper for digests stored as hex strings.
pub mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_digest_hex, to_hex, EvidenceHash};

    /// Serialize a digest as lowercase hex.
    pub fn serialize<S>(hash: &EvidenceHash, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_hex(hash))
    }

    /// Deserialize a digest from hex.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<EvidenceHash, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_digest_hex(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================
