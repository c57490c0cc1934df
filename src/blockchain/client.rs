//! JSON-RPC ledger backed by an alloy HTTP provider.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Estimate gas, sign and broadcast transactions
//! - Report submission progress and confirmations to lifecycle listeners
//! - Bound every RPC round trip with the configured timeout
//!
//! Failed calls are reported, never retried.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use tokio::time::{interval, timeout};

use crate::blockchain::ledger::Ledger;
use crate::blockchain::lifecycle::{EventSink, LifecycleEvent, SubmittedPayload};
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};

/// Blockchain RPC client implementing [`Ledger`].
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on a malformed URL. A chain-id mismatch is logged, not
    /// fatal, so an unreachable node does not prevent construction.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        let client = Self::with_provider(provider, config);

        if client.config.chain_id.is_some() {
            if let Err(e) = client.verify_chain_id().await {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        tracing::info!(
            rpc_url = %client.config.rpc_url,
            confirmation_blocks = client.config.confirmation_blocks,
            "Blockchain client initialized"
        );

        Ok(client)
    }

    /// Wrap an existing provider.
    pub fn with_provider(provider: Arc<dyn Provider + Send + Sync>, config: BlockchainConfig) -> Self {
        Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call(self.provider.get_chain_id(), BlockchainError::Rpc)
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call(self.provider.get_block_number(), BlockchainError::Rpc).await
    }

    /// Check if the node is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &(dyn Provider + Send + Sync) {
        self.provider.as_ref()
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Await an RPC call under the configured timeout.
    async fn call<F, T, E>(&self, fut: F, map_err: fn(String) -> BlockchainError) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_err(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Fill nonce, chain id and gas price from the node where the caller left
    /// them unset.
    async fn fill_for_signing(
        &self,
        mut request: TransactionRequest,
        signer: &PrivateKeySigner,
    ) -> BlockchainResult<TransactionRequest> {
        if request.nonce.is_none() {
            let from = request.from.unwrap_or_else(|| signer.address());
            let nonce = self
                .call(self.provider.get_transaction_count(from), BlockchainError::Rpc)
                .await?;
            request.set_nonce(nonce);
        }
        if request.chain_id.is_none() {
            request.set_chain_id(self.get_chain_id().await?.0);
        }
        if request.gas_price.is_none() && request.max_fee_per_gas.is_none() {
            let gas_price = self
                .call(self.provider.get_gas_price(), BlockchainError::Rpc)
                .await?;
            request.set_gas_price(gas_price);
        }
        Ok(request)
    }

    /// Report the hash, wait for the receipt and start the confirmation
    /// watcher.
    async fn track(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
        payload: SubmittedPayload,
        events: EventSink<TransactionReceipt>,
    ) -> BlockchainResult<TransactionReceipt> {
        let tx_hash = *pending.tx_hash();

        events.emit(LifecycleEvent::Sent(payload));
        events.emit(LifecycleEvent::TransactionHash(tx_hash));
        tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| BlockchainError::Receipt(e.to_string()))?;
        let receipt = ensure_success(receipt)?;

        tracing::info!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );

        events.emit(LifecycleEvent::Receipt(receipt.clone()));

        if let (true, Some(mined_at)) = (self.config.confirmation_blocks > 0, receipt.block_number) {
            let watcher = self.clone();
            let receipt = receipt.clone();
            tokio::spawn(async move {
                watcher
                    .watch_confirmations(tx_hash, mined_at, receipt, events)
                    .await;
            });
        }

        Ok(receipt)
    }

    /// Emit one confirmation per block mined on top of the receipt's block,
    /// up to `confirmation_blocks`, or until every listener has gone.
    async fn watch_confirmations<R: Clone>(
        &self,
        tx_hash: TxHash,
        mined_at: u64,
        receipt: R,
        events: EventSink<R>,
    ) {
        let required = u64::from(self.config.confirmation_blocks);
        let mut ticker = interval(Duration::from_millis(self.config.receipt_poll_interval_ms));
        let mut reported = 0u64;

        while reported < required && !events.is_detached() {
            ticker.tick().await;

            let current = match self.get_block_number().await {
                Ok(block) => block,
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Confirmation polling failed");
                    events.emit(LifecycleEvent::Error(e.into()));
                    return;
                }
            };

            let confirmations = current.saturating_sub(mined_at).min(required);
            while reported < confirmations {
                reported += 1;
                events.emit(LifecycleEvent::Confirmation {
                    confirmations: reported,
                    receipt: receipt.clone(),
                });
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = reported,
                required,
                "Waiting for confirmations"
            );
        }
    }
}

/// Reject receipts of transactions that were mined but reverted.
fn ensure_success(receipt: TransactionReceipt) -> BlockchainResult<TransactionReceipt> {
    if receipt.status() {
        Ok(receipt)
    } else {
        Err(BlockchainError::Reverted(receipt.transaction_hash.to_string()))
    }
}

impl Ledger for BlockchainClient {
    type Receipt = TransactionReceipt;

    async fn estimate_gas(&self, request: &TransactionRequest) -> BlockchainResult<u64> {
        self.call(self.provider.estimate_gas(request.clone()), BlockchainError::Estimation)
            .await
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
        events: EventSink<TransactionReceipt>,
    ) -> BlockchainResult<TransactionReceipt> {
        let payload = SubmittedPayload::Request(request.clone());
        events.emit(LifecycleEvent::Sending(payload.clone()));

        let pending = self
            .call(self.provider.send_transaction(request), BlockchainError::Submission)
            .await?;

        self.track(pending, payload, events).await
    }

    async fn sign_transaction(
        &self,
        request: TransactionRequest,
        signer: PrivateKeySigner,
    ) -> BlockchainResult<Bytes> {
        let request = self.fill_for_signing(request, &signer).await?;
        let wallet = EthereumWallet::from(signer);

        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok(Bytes::from(envelope.encoded_2718()))
    }

    async fn send_raw_transaction(
        &self,
        raw: Bytes,
        events: EventSink<TransactionReceipt>,
    ) -> BlockchainResult<TransactionReceipt> {
        let payload = SubmittedPayload::Raw(raw.clone());
        events.emit(LifecycleEvent::Sending(payload.clone()));

        let pending = self
            .call(self.provider.send_raw_transaction(&raw), BlockchainError::Submission)
            .await?;

        self.track(pending, payload, events).await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
