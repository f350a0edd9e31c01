//! Root Anchoring Interface
//!
//! Durable storage of committed roots lives outside this crate (a ledger
//! program, a database, ...). The engine only talks to it through
//! [`LedgerAnchor`]; [`MemoryAnchor`] is the in-process implementation used
//! by tests and the demo binary.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hash::{EvidenceHash, hex_digest, to_hex};
use crate::proof::evidence::ChainId;

/// Acknowledgement returned by [`LedgerAnchor::put_root`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorReceipt {
    /// Chain the root was anchored for.
    pub chain_id: ChainId,
    /// Anchored root.
    #[serde(with = "hex_digest")]
    pub root: EvidenceHash,
    /// False when the same root was already anchored.
    pub newly_anchored: bool,
}

/// Errors reported by an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    /// No root has been anchored for the chain.
    #[error("no root anchored for chain {0}")]
    NotAnchored(ChainId),
    /// A different root is already anchored for the chain.
    #[error("chain {chain_id} already anchored with root {existing}")]
    AlreadyAnchored {
        /// Chain that was already anchored.
        chain_id: ChainId,
        /// Hex of the existing root.
        existing: String,
    },
    /// The backing store failed.
    #[error("anchor backend error: {0}")]
    Backend(String),
}

/// External store of anchored roots.
pub trait LedgerAnchor {
    /// Look up the anchored root for a chain.
    fn get_root(&self, chain_id: &ChainId) -> Result<Option<EvidenceHash>, AnchorError>;

    /// Anchor a root for a chain.
    fn put_root(&self, chain_id: &ChainId, root: EvidenceHash) -> Result<AnchorReceipt, AnchorError>;
}

/// In-memory anchor.
///
/// Anchored roots are write-once per chain.
#[derive(Debug, Default)]
pub struct MemoryAnchor {
    roots: RwLock<BTreeMap<ChainId, EvidenceHash>>,
}

impl MemoryAnchor {
    /// Create an empty anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of anchored chains.
    pub fn len(&self) -> usize {
        self.roots.read().map(|roots| roots.len()).unwrap_or(0)
    }

    /// Whether nothing has been anchored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerAnchor for MemoryAnchor {
    fn get_root(&self, chain_id: &ChainId) -> Result<Option<EvidenceHash>, AnchorError> {
        let roots = self
            .roots
            .read()
            .map_err(|_| AnchorError::Backend("anchor lock poisoned".into()))?;
        Ok(roots.get(chain_id).copied())
    }

    fn put_root(&self, chain_id: &ChainId, root: EvidenceHash) -> Result<AnchorReceipt, AnchorError> {
        let mut roots = self
            .roots
            .write()
            .map_err(|_| AnchorError::Backend("anchor lock poisoned".into()))?;

        if let Some(existing) = roots.get(chain_id) {
            if *existing != root {
                warn!("Rejected re-anchor of chain {}", chain_id);
                return Err(AnchorError::AlreadyAnchored {
                    chain_id: *chain_id,
                    existing: to_hex(existing),
                });
            }
            return Ok(AnchorReceipt {
                chain_id: *chain_id,
                root,
                newly_anchored: false,
            });
        }

        roots.insert(*chain_id, root);
        debug!("Anchored chain {} with root {}", chain_id, to_hex(&root));

        Ok(AnchorReceipt {
            chain_id: *chain_id,
            root,
            newly_anchored: true,
        })
    }
}
