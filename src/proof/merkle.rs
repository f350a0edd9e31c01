//! Merkle Tree Commitments
//!
//! Binary SHA-256 Merkle tree over an ordered evidence chain.
//!
//! Tree shape:
//! - Leaves are the hashes of the evidence items, in order.
//! - Adjacent nodes are paired left-to-right and hashed as `H(left ∥ right)`.
//! - A level with an odd node count duplicates its last node (`H(x ∥ x)`).
//!   The lone node is never promoted unchanged.
//!
//! [`HashMode::Compat`] hashes leaves and nodes without any prefix.
//! [`HashMode::DomainSeparated`] prefixes leaves with `0x00` and nodes with `0x01`.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::{EvidenceHash, hash_bytes, hash_pair, hash_with_domain, hex_digest};

/// Leaf prefix for domain-separated trees.
const LEAF_PREFIX: &[u8] = &[0x00];

/// Node prefix for domain-separated trees.
const NODE_PREFIX: &[u8] = &[0x01];

/// How leaves and internal nodes are hashed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashMode {
    /// `leaf = H(item)`, `node = H(left ∥ right)`.
    #[default]
    Compat,
    /// `leaf = H(0x00 ∥ item)`, `node = H(0x01 ∥ left ∥ right)`.
    DomainSeparated,
}

impl HashMode {
    /// Hash one evidence item into a leaf.
    pub fn hash_leaf(self, data: &[u8]) -> EvidenceHash {
        match self {
            Self::Compat => hash_bytes(data),
            Self::DomainSeparated => hash_with_domain(LEAF_PREFIX, data),
        }
    }

    /// Hash two child nodes into their parent.
    pub fn hash_nodes(self, left: &EvidenceHash, right: &EvidenceHash) -> EvidenceHash {
        let prefix: &[u8] = match self {
            Self::Compat => &[],
            Self::DomainSeparated => NODE_PREFIX,
        };
        hash_pair(prefix, left, right)
    }

    /// Stable name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compat => "compat",
            Self::DomainSeparated => "domain-separated",
        }
    }
}

/// Structural misuse of the commitment engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// No evidence items were supplied.
    #[error("cannot commit to an empty evidence list")]
    EmptyInput,
    /// Proof requested for a leaf that does not exist.
    #[error("leaf index {index} out of range for {len} evidence items")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves in the tree.
        len: usize,
    },
}

/// Which side of the current node a sibling sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left child: fold as `H(sibling ∥ current)`.
    Left,
    /// Sibling is the right child: fold as `H(current ∥ sibling)`.
    Right,
}

/// One level of an inclusion proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest at this level.
    #[serde(with = "hex_digest")]
    pub sibling: EvidenceHash,
    /// Side of the sibling relative to the current node.
    pub side: Side,
}

/// Merkle inclusion proof.
///
/// Contains the path from a leaf to the root, lowest level first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Index of the leaf this proof is for.
    pub leaf_index: usize,
    /// Number of leaves in the tree the proof was built from.
    pub leaf_count: usize,
    /// Sibling digests from the leaf level up to just below the root.
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    /// Number of steps in the path.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Estimated size in bytes.
    pub fn size(&self) -> usize {
        16 + self.steps.len() * 33 // index + count + (hash + side) per step
    }

    /// Check that the proof shape matches its declared index and tree size.
    pub fn is_well_formed(&self) -> bool {
        self.leaf_count > 0
            && self.leaf_index < self.leaf_count
            && self.steps.len() == tree_depth(self.leaf_count)
    }
}

/// Depth of a tree with `leaf_count` leaves: `⌈log2 leaf_count⌉`, 0 for one leaf.
pub fn tree_depth(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        return 0;
    }
    (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
}

/// Binary Merkle tree with every level retained.
///
/// Useful when several proofs are needed for one chain.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    mode: HashMode,
    /// All tree levels (leaves at index 0, root level last).
    levels: Vec<Vec<EvidenceHash>>,
    root: EvidenceHash,
}

impl MerkleTree {
    /// Build a compatibility-mode tree from evidence items.
    pub fn from_items<T: AsRef<[u8]>>(items: &[T]) -> Result<Self, MerkleError> {
        Self::from_items_with_mode(items, HashMode::Compat)
    }

    /// Build a tree from evidence items using the given hash mode.
    pub fn from_items_with_mode<T: AsRef<[u8]>>(
        items: &[T],
        mode: HashMode,
    ) -> Result<Self, MerkleError> {
        let leaves = items.iter().map(|item| mode.hash_leaf(item.as_ref())).collect();
        Self::from_leaf_hashes(leaves, mode)
    }

    /// Build a tree from pre-hashed leaves.
    pub fn from_leaf_hashes(leaves: Vec<EvidenceHash>, mode: HashMode) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut levels = Vec::with_capacity(tree_depth(leaves.len()) + 1);
        let mut current_level = leaves;

        while current_level.len() > 1 {
            let next_level: Vec<EvidenceHash> = current_level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    mode.hash_nodes(left, right)
                })
                .collect();

            levels.push(current_level);
            current_level = next_level;
        }

        let root = current_level[0];
        levels.push(current_level);

        Ok(Self { mode, levels, root })
    }

    /// Root digest.
    pub fn root(&self) -> EvidenceHash {
        self.root
    }

    /// Hash mode the tree was built with.
    pub fn mode(&self) -> HashMode {
        self.mode
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Leaf digest at `index`.
    pub fn leaf(&self, index: usize) -> Option<EvidenceHash> {
        self.levels[0].get(index).copied()
    }

    /// All levels, leaves first.
    pub fn levels(&self) -> &[Vec<EvidenceHash>] {
        &self.levels
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        let len = self.leaf_count();
        if index >= len {
            return Err(MerkleError::IndexOutOfRange { index, len });
        }

        let mut steps = Vec::with_capacity(self.depth());
        let mut position = index;

        // Every level except the root contributes one sibling
        for level in &self.levels[..self.depth()] {
            let step = if position % 2 == 0 {
                // Odd tail pairs with itself
                let sibling = level.get(position + 1).unwrap_or(&level[position]);
                ProofStep { sibling: *sibling, side: Side::Right }
            } else {
                ProofStep { sibling: level[position - 1], side: Side::Left }
            };
            steps.push(step);
            position /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index,
            leaf_count: len,
            steps,
        })
    }
}

/// Hash one evidence item into a compatibility-mode leaf.
pub fn leaf_hash(item: &[u8]) -> EvidenceHash {
    HashMode::Compat.hash_leaf(item)
}

/// Compute the compatibility-mode root of an evidence list.
pub fn build_root<T: AsRef<[u8]>>(items: &[T]) -> Result<EvidenceHash, MerkleError> {
    build_root_with_mode(items, HashMode::Compat)
}

/// Compute the root of an evidence list using the given hash mode.
pub fn build_root_with_mode<T: AsRef<[u8]>>(
    items: &[T],
    mode: HashMode,
) -> Result<EvidenceHash, MerkleError> {
    MerkleTree::from_items_with_mode(items, mode).map(|tree| tree.root())
}

/// Build a compatibility-mode inclusion proof for `items[leaf_index]`.
pub fn build_proof<T: AsRef<[u8]>>(items: &[T], leaf_index: usize) -> Result<MerkleProof, MerkleError> {
    build_proof_with_mode(items, leaf_index, HashMode::Compat)
}

/// Build an inclusion proof for `items[leaf_index]` using the given hash mode.
pub fn build_proof_with_mode<T: AsRef<[u8]>>(
    items: &[T],
    leaf_index: usize,
    mode: HashMode,
) -> Result<MerkleProof, MerkleError> {
    if leaf_index >= items.len() {
        return Err(MerkleError::IndexOutOfRange { index: leaf_index, len: items.len() });
    }
    MerkleTree::from_items_with_mode(items, mode)?.proof(leaf_index)
}

/// Verify a compatibility-mode proof against an expected root.
pub fn verify_proof(leaf_digest: &EvidenceHash, proof: &MerkleProof, expected_root: &EvidenceHash) -> bool {
    verify_proof_with_mode(leaf_digest, proof, expected_root, HashMode::Compat)
}

/// Verify a proof against an expected root using the given hash mode.
///
/// Malformed proofs verify as `false`. This function never panics.
pub fn verify_proof_with_mode(
    leaf_digest: &EvidenceHash,
    proof: &MerkleProof,
    expected_root: &EvidenceHash,
    mode: HashMode,
) -> bool {
    if !proof.is_well_formed() {
        return false;
    }

    let mut current_hash = *leaf_digest;
    let mut position = proof.leaf_index;
    let mut width = proof.leaf_count;

    for step in &proof.steps {
        let is_right_child = position % 2 == 1;
        current_hash = match step.side {
            Side::Left if is_right_child => mode.hash_nodes(&step.sibling, &current_hash),
            Side::Right if !is_right_child => {
                // The odd tail of a level can only be paired with itself
                if position + 1 == width && step.sibling != current_hash {
                    return false;
                }
                mode.hash_nodes(&current_hash, &step.sibling)
            }
            _ => return false,
        };

        position /= 2;
        width = width / 2 + width % 2;
    }

    current_hash == *expected_root
}
