//! Batch Verification
//!
//! Runs many independent verifications on the tokio blocking pool.
//! Results come back in input order.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::debug;

use crate::core::hash::EvidenceHash;
use crate::proof::evidence::EvidenceChain;
use crate::proof::merkle::{HashMode, MerkleError};
use crate::proof::verify::{verify_chain, TraceabilityResult};
use crate::statement::canonical::MessageFormat;
use crate::statement::signature::{SignedStatement, StatementStatus};

/// Batch execution errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A blocking task panicked or was cancelled.
    #[error("verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// A task finished without reporting a result.
    #[error("batch finished with missing results")]
    Incomplete,
}

/// One chain to check against its expected root.
#[derive(Clone, Debug)]
pub struct ChainRequest {
    /// Evidence to recompute.
    pub chain: EvidenceChain,
    /// Previously anchored root.
    pub expected_root: EvidenceHash,
}

/// Verify many chains concurrently.
///
/// Each entry is the outcome for the request at the same position.
pub async fn verify_chains(
    requests: Vec<ChainRequest>,
    mode: HashMode,
) -> Result<Vec<Result<TraceabilityResult, MerkleError>>, BatchError> {
    debug!("Verifying {} chains", requests.len());
    run_blocking(requests, move |request| {
        verify_chain(&request.chain, &request.expected_root, mode)
    })
    .await
}

/// Verify many statements concurrently.
pub async fn verify_statements(
    statements: Vec<SignedStatement>,
    format: MessageFormat,
) -> Result<Vec<StatementStatus>, BatchError> {
    debug!("Verifying {} statements", statements.len());
    run_blocking(statements, move |statement| statement.verify(format)).await
}

async fn run_blocking<I, O, F>(inputs: Vec<I>, work: F) -> Result<Vec<O>, BatchError>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> O + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let mut slots: Vec<Option<O>> = inputs.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let work = Arc::clone(&work);
        tasks.spawn_blocking(move || (index, work(input)));
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, output) = joined?;
        slots[index] = Some(output);
    }

    slots.into_iter().collect::<Option<Vec<O>>>().ok_or(BatchError::Incomplete)
}
