//! Verification API
//!
//! Recompute an evidence chain's root and compare it with a previously
//! anchored root. Failures report only the recomputed root and depth,
//! never which item diverged.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::core::hash::{EvidenceHash, hex_digest, to_hex};
use crate::proof::anchor::{AnchorError, LedgerAnchor};
use crate::proof::evidence::{ChainId, EvidenceChain};
use crate::proof::merkle::{HashMode, MerkleError, MerkleTree};

/// Outcome of a traceability check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityResult {
    /// Chain that was checked.
    pub chain_id: ChainId,
    /// Did the recomputed root match the expected root?
    pub is_valid: bool,
    /// Root recomputed from the supplied evidence.
    #[serde(with = "hex_digest")]
    pub recomputed_root: EvidenceHash,
    /// Tree depth, `⌈log2 n⌉`.
    pub proof_depth: usize,
}

/// Errors that prevent a traceability check from running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceabilityError {
    /// The evidence list could not be committed.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// The anchor lookup failed.
    #[error(transparent)]
    Anchor(#[from] AnchorError),
}

/// Recompute the compatibility-mode root of `items` and compare it with `expected_root`.
pub fn verify_traceability<T: AsRef<[u8]>>(
    chain_id: ChainId,
    items: &[T],
    expected_root: &EvidenceHash,
) -> Result<TraceabilityResult, MerkleError> {
    verify_traceability_with_mode(chain_id, items, expected_root, HashMode::Compat)
}

/// Recompute the root of `items` under `mode` and compare it with `expected_root`.
pub fn verify_traceability_with_mode<T: AsRef<[u8]>>(
    chain_id: ChainId,
    items: &[T],
    expected_root: &EvidenceHash,
    mode: HashMode,
) -> Result<TraceabilityResult, MerkleError> {
    let tree = MerkleTree::from_items_with_mode(items, mode)?;
    let recomputed_root = tree.root();
    let is_valid = recomputed_root == *expected_root;

    debug!(
        "Traceability check for chain {}: valid={} depth={} root={}",
        chain_id,
        is_valid,
        tree.depth(),
        to_hex(&recomputed_root)
    );

    Ok(TraceabilityResult {
        chain_id,
        is_valid,
        recomputed_root,
        proof_depth: tree.depth(),
    })
}

/// Verify a typed evidence chain against an expected root.
pub fn verify_chain(
    chain: &EvidenceChain,
    expected_root: &EvidenceHash,
    mode: HashMode,
) -> Result<TraceabilityResult, MerkleError> {
    verify_traceability_with_mode(chain.chain_id, &chain.evidence_strings(), expected_root, mode)
}

/// Fetch the anchored root for `chain_id` and verify `items` against it.
pub fn verify_anchored<A, T>(
    anchor: &A,
    chain_id: ChainId,
    items: &[T],
    mode: HashMode,
) -> Result<TraceabilityResult, TraceabilityError>
where
    A: LedgerAnchor + ?Sized,
    T: AsRef<[u8]>,
{
    let expected_root = anchor
        .get_root(&chain_id)?
        .ok_or(AnchorError::NotAnchored(chain_id))?;

    Ok(verify_traceability_with_mode(chain_id, items, &expected_root, mode)?)
}

/// Commit a typed evidence chain and anchor its root.
pub fn anchor_chain<A>(
    anchor: &A,
    chain: &EvidenceChain,
    mode: HashMode,
) -> Result<EvidenceHash, TraceabilityError>
where
    A: LedgerAnchor + ?Sized,
{
    let root = chain.commit(mode)?.root();
    anchor.put_root(&chain.chain_id, root)?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::parse_digest_hex;
    use crate::proof::anchor::MemoryAnchor;
    use crate::proof::evidence::{EvidenceItem, EvidenceKind};
    use sha2::{Digest, Sha256};

    const CHIAPAS: [&str; 3] = [
        "sourced:chiapas:2024-01-15",
        "spun:mill-001:2024-01-20",
        "woven:artisan-001:2024-02-10",
    ];

    /// Independent recursive reimplementation of the documented tree rule.
    fn reference_root(items: &[&str], leaf_prefix: &[u8], node_prefix: &[u8]) -> [u8; 32] {
        fn fold(level: Vec<[u8; 32]>, node_prefix: &[u8]) -> [u8; 32] {
            if level.len() == 1 {
                return level[0];
            }
            let mut next = Vec::new();
            let mut i = 0;
            while i < level.len() {
                let left = level[i];
                let right = if i + 1 < level.len() { level[i + 1] } else { level[i] };
                let mut h = Sha256::new();
                h.update(node_prefix);
                h.update(left);
                h.update(right);
                next.push(h.finalize().into());
                i += 2;
            }
            fold(next, node_prefix)
        }

        let leaves = items
            .iter()
            .map(|item| {
                let mut h = Sha256::new();
                h.update(leaf_prefix);
                h.update(item.as_bytes());
                h.finalize().into()
            })
            .collect();
        fold(leaves, node_prefix)
    }

    #[test]
    fn test_chiapas_scenario() {
        let chain_id = ChainId::from_bytes([3; 16]);
        let expected = reference_root(&CHIAPAS, b"", b"");

        let result = verify_traceability(chain_id, &CHIAPAS, &expected).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.recomputed_root, expected);
        assert_eq!(result.proof_depth, 2);

        // Change the spinning date
        let mut mutated = CHIAPAS;
        mutated[1] = "spun:mill-001:2024-01-21";

        let result = verify_traceability(chain_id, &mutated, &expected).unwrap();
        assert!(!result.is_valid);
        assert_ne!(result.recomputed_root, expected);
        assert_eq!(result.recomputed_root, reference_root(&mutated, b"", b""));
    }

    #[test]
    fn test_chiapas_scenario_domain_separated() {
        let chain_id = ChainId::from_bytes([3; 16]);
        let expected = reference_root(&CHIAPAS, &[0x00], &[0x01]);

        let result =
            verify_traceability_with_mode(chain_id, &CHIAPAS, &expected, HashMode::DomainSeparated)
                .unwrap();
        assert!(result.is_valid);

        // Compat root must not validate under the separated rule
        let compat = reference_root(&CHIAPAS, b"", b"");
        assert_ne!(compat, expected);
        let result =
            verify_traceability_with_mode(chain_id, &CHIAPAS, &compat, HashMode::DomainSeparated)
                .unwrap();
        assert!(!result.is_valid);
    }

    #[test]
    fn test_single_item_depth_zero() {
        let chain_id = ChainId::from_bytes([3; 16]);
        let root = crate::proof::merkle::leaf_hash(b"a");

        let result = verify_traceability(chain_id, &["a"], &root).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.proof_depth, 0);
    }

    #[test]
    fn test_reordered_and_truncated_fail() {
        let chain_id = ChainId::from_bytes([3; 16]);
        let expected = reference_root(&CHIAPAS, b"", b"");

        let reordered = [CHIAPAS[1], CHIAPAS[0], CHIAPAS[2]];
        assert!(!verify_traceability(chain_id, &reordered, &expected).unwrap().is_valid);

        let truncated = [CHIAPAS[0], CHIAPAS[1]];
        let result = verify_traceability(chain_id, &truncated, &expected).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.proof_depth, 1);
    }

    #[test]
    fn test_empty_evidence_is_error() {
        let empty: [&str; 0] = [];
        let result = verify_traceability(ChainId::new(), &empty, &[0; 32]);
        assert_eq!(result, Err(MerkleError::EmptyInput));
    }

    #[test]
    fn test_anchor_roundtrip() {
        let anchor = MemoryAnchor::new();
        let chain = EvidenceChain::new(ChainId::from_bytes([5; 16]))
            .with_item(EvidenceItem::new(EvidenceKind::Source, "chiapas", 1_705_276_800_000))
            .with_item(EvidenceItem::new(EvidenceKind::Craft, "artisan-001", 1_707_523_200_000));

        let root = anchor_chain(&anchor, &chain, HashMode::Compat).unwrap();

        let result =
            verify_anchored(&anchor, chain.chain_id, &chain.evidence_strings(), HashMode::Compat)
                .unwrap();
        assert!(result.is_valid);
        assert_eq!(result.recomputed_root, root);

        let mut tampered = chain.evidence_strings();
        tampered[0].push('!');
        let result = verify_anchored(&anchor, chain.chain_id, &tampered, HashMode::Compat).unwrap();
        assert!(!result.is_valid);
    }

    #[test]
    fn test_unanchored_chain() {
        let anchor = MemoryAnchor::new();
        let chain_id = ChainId::from_bytes([6; 16]);

        let result = verify_anchored(&anchor, chain_id, &["a"], HashMode::Compat);
        assert_eq!(result, Err(TraceabilityError::Anchor(AnchorError::NotAnchored(chain_id))));
    }

    #[test]
    fn test_anchor_as_trait_object() {
        let anchor: Box<dyn LedgerAnchor> = Box::new(MemoryAnchor::new());
        let chain_id = ChainId::from_bytes([4; 16]);
        let root = crate::proof::merkle::build_root(&CHIAPAS).unwrap();
        anchor.put_root(&chain_id, root).unwrap();

        let result = verify_anchored(anchor.as_ref(), chain_id, &CHIAPAS, HashMode::Compat).unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn test_result_json() {
        let chain_id = ChainId::from_bytes([3; 16]);
        let root = reference_root(&CHIAPAS, b"", b"");
        let result = verify_traceability(chain_id, &CHIAPAS, &root).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["proof_depth"], 2);

        let hex = json["recomputed_root"].as_str().unwrap();
        assert_eq!(parse_digest_hex(hex).unwrap(), root);
    }
}
