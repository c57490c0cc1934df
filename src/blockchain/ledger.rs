//! Ledger access abstraction consumed by the transaction core.

use std::fmt::Debug;
use std::future::Future;

use alloy::primitives::Bytes;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::lifecycle::EventSink;
use crate::blockchain::types::BlockchainResult;

/// Everything the transaction core needs from a connection to the chain.
///
/// Submissions write their progress into the provided [`EventSink`] in
/// lifecycle order and resolve with the receipt. Implementations may keep a
/// clone of the sink to report confirmations after resolving.
pub trait Ledger: Send + Sync + 'static {
    /// Receipt produced once a transaction is mined.
    type Receipt: Clone + Debug + Send + Sync + 'static;

    /// Estimate the gas a request would use.
    fn estimate_gas(
        &self,
        request: &TransactionRequest,
    ) -> impl Future<Output = BlockchainResult<u64>> + Send;

    /// Submit a request for the node to sign with an unlocked account.
    fn send_transaction(
        &self,
        request: TransactionRequest,
        events: EventSink<Self::Receipt>,
    ) -> impl Future<Output = BlockchainResult<Self::Receipt>> + Send;

    /// Sign a request locally, returning the encoded transaction.
    fn sign_transaction(
        &self,
        request: TransactionRequest,
        signer: PrivateKeySigner,
    ) -> impl Future<Output = BlockchainResult<Bytes>> + Send;

    /// Submit an already signed transaction.
    fn send_raw_transaction(
        &self,
        raw: Bytes,
        events: EventSink<Self::Receipt>,
    ) -> impl Future<Output = BlockchainResult<Self::Receipt>> + Send;
}
