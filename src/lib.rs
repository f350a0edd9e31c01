//! # Garment Provenance Engine
//!
//! Tamper-evident provenance records for physical garments.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  GARMENT PROVENANCE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Hashing primitives                        │
//! │  └── hash.rs     - SHA-256 digests, hex boundary             │
//! │                                                              │
//! │  proof/          - Evidence commitments                      │
//! │  ├── evidence.rs - Typed evidence items and chains           │
//! │  ├── merkle.rs   - Merkle roots and inclusion proofs         │
//! │  ├── anchor.rs   - External root anchoring interface         │
//! │  └── verify.rs   - Traceability verification                 │
//! │                                                              │
//! │  statement/      - Signed posts and comments                 │
//! │  ├── canonical.rs- Canonical message bytes                   │
//! │  └── signature.rs- Ed25519 verification                      │
//! │                                                              │
//! │  batch.rs        - Concurrent verification                   │
//! │  config.rs       - Engine configuration                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! Every operation is a pure function of its inputs:
//! - No I/O, no shared mutable state inside the engine
//! - Same ordered evidence, same root, on any platform
//! - Untrusted proofs and signatures verify as `false`, never panic

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod config;
pub mod core;
pub mod proof;
pub mod statement;

// Re-export commonly used types
pub use crate::config::{EngineConfig, ConfigError};
pub use crate::core::hash::{EvidenceHash, parse_digest_hex, to_hex};
pub use crate::proof::{
    build_proof, build_root, leaf_hash, verify_proof, verify_traceability,
    ChainId, EvidenceChain, EvidenceItem, EvidenceKind, HashMode, LedgerAnchor,
    MerkleError, MerkleProof, MerkleTree, TraceabilityResult,
};
pub use crate::statement::{canonical_message, MessageFormat, SignedStatement, StatementStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
