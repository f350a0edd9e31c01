//! Core hashing primitives.
//!
//! Everything the commitment engine hashes goes through this module so that
//! leaf, node and boundary encodings stay in one place.

pub mod hash;

// Re-export core types
pub use self::hash::{EvidenceHash, hash_bytes, parse_digest_hex, to_hex, DigestParseError};
