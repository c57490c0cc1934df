//! Chain-specific types and error definitions.

use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors raised by the ledger while estimating, signing or submitting.
///
/// Payloads are rendered to strings so the error stays `Clone` and can be
/// broadcast to lifecycle listeners.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node refused to estimate gas (reverts included).
    #[error("Gas estimation failed: {0}")]
    Estimation(String),

    /// Local signing of a transaction failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node rejected the transaction.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The transaction was accepted but its receipt could not be obtained.
    #[error("Receipt unavailable: {0}")]
    Receipt(String),

    /// Transaction was mined but reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The submission task ended without reporting an outcome.
    #[error("Submission aborted before settling")]
    Aborted,
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
