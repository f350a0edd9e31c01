//! Evidence Commitment System
//!
//! Provides tamper-evident provenance records through:
//! - Typed evidence chains
//! - Merkle tree commitments and inclusion proofs
//! - Root anchoring through an external ledger interface
//! - Verification by recomputation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   COMMITMENT ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  evidence.rs     - Evidence items and chains                │
//! │  merkle.rs       - Binary Merkle tree, proofs, hash modes   │
//! │  anchor.rs       - LedgerAnchor trait + in-memory anchor    │
//! │  verify.rs       - Traceability verification                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod evidence;
pub mod merkle;
pub mod anchor;
pub mod verify;

// Re-export key types
pub use evidence::{ChainId, EvidenceChain, EvidenceItem, EvidenceKind};
pub use merkle::{
    build_proof, build_proof_with_mode, build_root, build_root_with_mode, leaf_hash,
    tree_depth, verify_proof, verify_proof_with_mode,
    HashMode, MerkleError, MerkleProof, MerkleTree, ProofStep, Side,
};
pub use anchor::{AnchorError, AnchorReceipt, LedgerAnchor, MemoryAnchor};
pub use verify::{
    anchor_chain, verify_anchored, verify_chain, verify_traceability,
    verify_traceability_with_mode, TraceabilityError, TraceabilityResult,
};
