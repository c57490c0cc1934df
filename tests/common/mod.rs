//! Shared utilities for integration tests: an in-memory ledger.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use eightpay::blockchain::types::{BlockchainError, BlockchainResult};
use eightpay::blockchain::{EventSink, LifecycleEvent, SubmittedPayload};
use eightpay::{ContractName, DeploymentRegistry, Ledger, Network};

pub const PLAN_ID: &str = "0x57b2059e526841b3dfd964144513359c9fcfd6d91040b6c47f589c1e032b6bf4";
pub const SUBSCRIPTION_ID: &str = "0xe63ba761797e289076f80a7c0916a31740684806aaf507da85f81ee785fec6ba";

pub const PRIVATE_KEY: &str = "0x1aba488300a9d7297a315d127837be4219107c62c61966ecdf7a75431d75cc61";
pub const PRIVATE_ADDRESS: Address = address!("2B522cABE9950D1153c26C1b399B293CaA99FcF9");
pub const UNLOCKED: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const FIXED_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const VARIABLE_ADDRESS: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const ON_DEMAND_ADDRESS: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

/// Registry with all three contracts deployed on the private network.
pub fn registry() -> DeploymentRegistry {
    DeploymentRegistry::new()
        .with_deployment(
            Network::Private,
            ContractName::FixedRecurringSubscriptionsManagement,
            FIXED_ADDRESS,
        )
        .with_deployment(
            Network::Private,
            ContractName::VariableRecurringSubscriptionsManagement,
            VARIABLE_ADDRESS,
        )
        .with_deployment(
            Network::Private,
            ContractName::OnDemandSubscriptionsManagement,
            ON_DEMAND_ADDRESS,
        )
}

/// Receipt produced by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReceipt {
    pub tx_hash: TxHash,
    pub from: Option<Address>,
    pub gas: Option<u64>,
    pub signed: bool,
}

/// What reached the mock's submission endpoints.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub request: TransactionRequest,
    pub signed: bool,
}

/// Ledger that answers from memory and records every call.
#[derive(Debug)]
pub struct MockLedger {
    pub gas_estimate: u64,
    pub confirmations: u64,
    pub estimate_error: Option<BlockchainError>,
    pub submit_error: Option<BlockchainError>,
    pub estimates: Mutex<Vec<TransactionRequest>>,
    pub submitted: Mutex<Vec<Submitted>>,
    pub calls: AtomicUsize,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            gas_estimate: 100_000,
            confirmations: 2,
            estimate_error: None,
            submit_error: None,
            estimates: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_estimate(gas_estimate: u64) -> Arc<Self> {
        Arc::new(Self {
            gas_estimate,
            ..Default::default()
        })
    }

    pub fn failing_estimate(error: BlockchainError) -> Arc<Self> {
        Arc::new(Self {
            estimate_error: Some(error),
            ..Default::default()
        })
    }

    pub fn failing_submission(error: BlockchainError) -> Arc<Self> {
        Arc::new(Self {
            submit_error: Some(error),
            ..Default::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn estimates(&self) -> Vec<TransactionRequest> {
        self.estimates.lock().unwrap().clone()
    }

    fn mine(
        &self,
        request: TransactionRequest,
        payload: SubmittedPayload,
        signed: bool,
        events: EventSink<MockReceipt>,
    ) -> BlockchainResult<MockReceipt> {
        events.emit(LifecycleEvent::Sending(payload.clone()));

        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }

        let encoded = serde_json::to_vec(&request).unwrap();
        let tx_hash = keccak256(&encoded);

        self.submitted.lock().unwrap().push(Submitted {
            request: request.clone(),
            signed,
        });

        events.emit(LifecycleEvent::Sent(payload));
        events.emit(LifecycleEvent::TransactionHash(tx_hash));

        let receipt = MockReceipt {
            tx_hash,
            from: request.from,
            gas: request.gas,
            signed,
        };
        events.emit(LifecycleEvent::Receipt(receipt.clone()));

        for confirmations in 1..=self.confirmations {
            events.emit(LifecycleEvent::Confirmation {
                confirmations,
                receipt: receipt.clone(),
            });
        }

        Ok(receipt)
    }
}

impl Ledger for MockLedger {
    type Receipt = MockReceipt;

    async fn estimate_gas(&self, request: &TransactionRequest) -> BlockchainResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.estimates.lock().unwrap().push(request.clone());
        match &self.estimate_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.gas_estimate),
        }
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
        events: EventSink<MockReceipt>,
    ) -> BlockchainResult<MockReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = SubmittedPayload::Request(request.clone());
        self.mine(request, payload, false, events)
    }

    async fn sign_transaction(
        &self,
        request: TransactionRequest,
        signer: PrivateKeySigner,
    ) -> BlockchainResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.from != Some(signer.address()) {
            return Err(BlockchainError::Signing("sender does not match key".to_string()));
        }
        Ok(Bytes::from(serde_json::to_vec(&request).unwrap()))
    }

    async fn send_raw_transaction(
        &self,
        raw: Bytes,
        events: EventSink<MockReceipt>,
    ) -> BlockchainResult<MockReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request: TransactionRequest = serde_json::from_slice(&raw)
            .map_err(|e| BlockchainError::Submission(e.to_string()))?;
        self.mine(request, SubmittedPayload::Raw(raw), true, events)
    }
}
