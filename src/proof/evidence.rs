//! Evidence Chain Model
//!
//! Typed provenance facts for one garment. Each item renders to the byte
//! string that becomes a Merkle leaf; the order of items is significant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::proof::merkle::{HashMode, MerkleError, MerkleTree};

/// Identifier of one garment's evidence chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub Uuid);

impl ChainId {
    /// Create a new random chain ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from raw UUID bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Raw UUID bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Stage of the garment's life an evidence item records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    /// Raw material sourcing.
    Source,
    /// Industrial processing (spinning, dyeing, ...).
    Process,
    /// Artisan craft work.
    Craft,
    /// Quality assurance.
    #[serde(rename = "qa")]
    QA,
}

impl EvidenceKind {
    /// Tag written into the leaf string.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Process => "process",
            Self::Craft => "craft",
            Self::QA => "qa",
        }
    }
}

/// One provenance fact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Kind of event.
    pub kind: EvidenceKind,
    /// Free-text detail (origin, facility, artisan, ...).
    pub payload: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

impl EvidenceItem {
    /// Create a new evidence item.
    pub fn new(kind: EvidenceKind, payload: impl Into<String>, timestamp: i64) -> Self {
        Self {
            kind,
            payload: payload.into(),
            timestamp,
        }
    }

    /// Leaf string: `kind:payload:timestamp`.
    pub fn to_evidence_string(&self) -> String {
        format!("{}:{}:{}", self.kind.tag(), self.payload, self.timestamp)
    }

    /// Timestamp as a UTC date-time, if representable.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Ordered evidence for one garment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceChain {
    /// Chain identifier used when anchoring.
    pub chain_id: ChainId,
    /// Evidence items in custody order.
    pub items: Vec<EvidenceItem>,
}

impl EvidenceChain {
    /// Create an empty chain.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            items: Vec::new(),
        }
    }

    /// Append an item (builder style).
    pub fn with_item(mut self, item: EvidenceItem) -> Self {
        self.items.push(item);
        self
    }

    /// Append an item.
    pub fn push(&mut self, item: EvidenceItem) {
        self.items.push(item);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the chain has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Leaf strings in order.
    pub fn evidence_strings(&self) -> Vec<String> {
        self.items.iter().map(EvidenceItem::to_evidence_string).collect()
    }

    /// Build the Merkle tree committing to this chain.
    pub fn commit(&self, mode: HashMode) -> Result<MerkleTree, MerkleError> {
        MerkleTree::from_items_with_mode(&self.evidence_strings(), mode)
    }
}
