//! Transaction core: signing-mode selection, gas estimation and submission.
//!
//! # Responsibilities
//! - Build the raw request from a pending call and the caller's options
//! - Estimate gas and pad the estimate by 20%
//! - Submit through an unlocked node account or sign locally first
//! - Relay the ledger's lifecycle events through one handle for both paths

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::runtime::Handle;

use crate::blockchain::ledger::Ledger;
use crate::blockchain::lifecycle::{
    EventSink, LifecycleEvent, LifecycleHandle, LifecycleOutcome,
};
use crate::blockchain::wallet::{Account, Accounts};
use crate::error::{Error, Result};

/// Gas limit submitted for an estimate: `floor(estimate * 1.2)`.
pub fn apply_gas_margin(estimate: u64) -> u64 {
    let padded = u128::from(estimate) * 6 / 5;
    u64::try_from(padded).unwrap_or(u64::MAX)
}

/// A validated contract call: destination and ABI-encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub destination: Address,
    pub payload: Bytes,
}

/// Caller-supplied submission options.
///
/// `private_key` takes precedence over `from`: when present the sender is the
/// address derived from it. Every other field is copied onto the request
/// as-is; `gas` only bounds the estimate and is replaced by the padded one.
#[derive(Clone, Default)]
pub struct SubmissionOptions {
    pub from: Option<Address>,
    pub private_key: Option<String>,
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
    pub chain_id: Option<u64>,
}

impl SubmissionOptions {
    /// Options for a node-managed (unlocked) sender.
    pub fn from_address(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Default::default()
        }
    }

    /// Options for a locally signed submission.
    pub fn from_private_key(private_key: impl Into<String>) -> Self {
        Self {
            private_key: Some(private_key.into()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_max_fee_per_gas(mut self, max_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas);
        self
    }

    pub fn with_max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: u128) -> Self {
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Copy the passthrough fields onto a request.
    fn merge_into(&self, mut request: TransactionRequest) -> TransactionRequest {
        if let Some(value) = self.value {
            request.set_value(value);
        }
        if let Some(gas) = self.gas {
            request.set_gas_limit(gas);
        }
        if let Some(gas_price) = self.gas_price {
            request.set_gas_price(gas_price);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            request.set_max_fee_per_gas(max_fee);
        }
        if let Some(priority_fee) = self.max_priority_fee_per_gas {
            request.set_max_priority_fee_per_gas(priority_fee);
        }
        if let Some(nonce) = self.nonce {
            request.set_nonce(nonce);
        }
        if let Some(chain_id) = self.chain_id {
            request.set_chain_id(chain_id);
        }
        request
    }
}

impl std::fmt::Debug for SubmissionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionOptions")
            .field("from", &self.from)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("value", &self.value)
            .field("gas", &self.gas)
            .field("gas_price", &self.gas_price)
            .field("max_fee_per_gas", &self.max_fee_per_gas)
            .field("max_priority_fee_per_gas", &self.max_priority_fee_per_gas)
            .field("nonce", &self.nonce)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// How a submission gets its signature.
#[derive(Debug, Clone)]
pub enum SigningMode {
    /// The node holds the key for this address.
    Unlocked(Address),
    /// Sign locally with this account.
    LocalKey(Account),
}

impl SigningMode {
    /// Pick the signing mode for a set of options.
    pub fn resolve(options: &SubmissionOptions) -> Result<Self> {
        match (&options.private_key, options.from) {
            (Some(key), _) => Ok(Self::LocalKey(Accounts.from_private_key(key)?)),
            (None, Some(from)) => Ok(Self::Unlocked(from)),
            (None, None) => Err(Error::MissingSender),
        }
    }

    pub fn sender(&self) -> Address {
        match self {
            Self::Unlocked(from) => *from,
            Self::LocalKey(account) => account.address(),
        }
    }

    /// Raw request for this sender, without a padded gas limit.
    pub fn build_request(&self, call: &PendingCall, options: &SubmissionOptions) -> TransactionRequest {
        raw_request(call, Some(self.sender()), options)
    }

    /// Hand a gas-padded request to the ledger.
    async fn submit<L: Ledger>(
        self,
        ledger: &L,
        request: TransactionRequest,
        events: EventSink<L::Receipt>,
    ) -> Result<L::Receipt> {
        match self {
            Self::Unlocked(from) => {
                tracing::info!(from = %from, "Submitting through unlocked account");
                Ok(ledger.send_transaction(request, events).await?)
            }
            Self::LocalKey(account) => {
                tracing::info!(from = %account.address(), "Signing transaction locally");
                let raw = ledger
                    .sign_transaction(request, account.signer().clone())
                    .await?;
                Ok(ledger.send_raw_transaction(raw, events).await?)
            }
        }
    }
}

fn raw_request(call: &PendingCall, from: Option<Address>, options: &SubmissionOptions) -> TransactionRequest {
    let mut request = TransactionRequest::default()
        .with_to(call.destination)
        .with_input(call.payload.clone());
    if let Some(from) = from {
        request.set_from(from);
    }
    options.merge_into(request)
}

/// A pending contract call bound to a ledger, ready to be estimated or sent.
#[derive(Debug)]
pub struct Transaction<L> {
    ledger: Arc<L>,
    call: PendingCall,
}

impl<L> Clone for Transaction<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            call: self.call.clone(),
        }
    }
}

impl<L: Ledger> Transaction<L> {
    /// Bind a call to a ledger.
    pub fn new(ledger: Arc<L>, to: Address, data: Bytes) -> Self {
        Self {
            ledger,
            call: PendingCall {
                destination: to,
                payload: data,
            },
        }
    }

    /// Destination contract.
    pub fn to(&self) -> Address {
        self.call.destination
    }

    /// Encoded call payload.
    pub fn data(&self) -> &Bytes {
        &self.call.payload
    }

    pub fn call(&self) -> &PendingCall {
        &self.call
    }

    /// Estimate, pad and submit the call.
    ///
    /// Fails immediately when `options` is `None`, or with
    /// [`Error::NoRuntime`] when called outside a Tokio runtime. Every later
    /// failure is reported as an `Error` event followed by the handle
    /// resolving to the same error.
    pub fn send(&self, options: Option<SubmissionOptions>) -> Result<LifecycleHandle<L::Receipt>> {
        let options = options.ok_or(Error::MissingOptions)?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let (sink, events) = EventSink::channel();
        let (outcome_tx, outcome) = LifecycleOutcome::channel();

        let ledger = self.ledger.clone();
        let call = self.call.clone();

        runtime.spawn(async move {
            let result = submit(ledger.as_ref(), &call, &options, sink.clone()).await;
            if let Err(e) = &result {
                tracing::warn!(to = %call.destination, error = %e, "Transaction submission failed");
                sink.emit(LifecycleEvent::Error(e.clone()));
            }
            let _ = outcome_tx.send(result);
        });

        Ok(LifecycleHandle::new(events, outcome))
    }

    /// Estimate gas for the call as it would be sent with `options`.
    /// No margin is applied and nothing is submitted.
    pub async fn estimate_gas(&self, options: SubmissionOptions) -> Result<u64> {
        let from = match &options.private_key {
            Some(key) => Some(Accounts.from_private_key(key)?.address()),
            None => options.from,
        };
        let request = raw_request(&self.call, from, &options);
        Ok(self.ledger.estimate_gas(&request).await?)
    }
}

async fn submit<L: Ledger>(
    ledger: &L,
    call: &PendingCall,
    options: &SubmissionOptions,
    events: EventSink<L::Receipt>,
) -> Result<L::Receipt> {
    let mode = SigningMode::resolve(options)?;
    let request = mode.build_request(call, options);

    let estimate = ledger.estimate_gas(&request).await?;
    let gas = apply_gas_margin(estimate);

    tracing::debug!(
        to = %call.destination,
        from = %mode.sender(),
        estimate,
        gas,
        "Gas estimated"
    );

    mode.submit(ledger, request.with_gas_limit(gas), events).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, bytes};

    const PRIVATE_KEY: &str = "0x1aba488300a9d7297a315d127837be4219107c62c61966ecdf7a75431d75cc61";
    const DERIVED: Address = address!("2B522cABE9950D1153c26C1b399B293CaA99FcF9");
    const UNLOCKED: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn call() -> PendingCall {
        PendingCall {
            destination: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            payload: bytes!("a9059cbb"),
        }
    }

    #[test]
    fn test_gas_margin() {
        assert_eq!(apply_gas_margin(100_000), 120_000);
        assert_eq!(apply_gas_margin(100_001), 120_001);
        assert_eq!(apply_gas_margin(21_000), 25_200);
        assert_eq!(apply_gas_margin(0), 0);
        assert_eq!(apply_gas_margin(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_private_key_takes_precedence() {
        let mut options = SubmissionOptions::from_private_key(PRIVATE_KEY);
        options.from = Some(UNLOCKED);

        let mode = SigningMode::resolve(&options).unwrap();
        assert!(matches!(mode, SigningMode::LocalKey(_)));
        assert_eq!(mode.sender(), DERIVED);
    }

    #[test]
    fn test_unlocked_and_missing_sender() {
        let mode = SigningMode::resolve(&SubmissionOptions::from_address(UNLOCKED)).unwrap();
        assert!(matches!(mode, SigningMode::Unlocked(a) if a == UNLOCKED));

        let err = SigningMode::resolve(&SubmissionOptions::default()).unwrap_err();
        assert_eq!(err, Error::MissingSender);
    }

    #[test]
    fn test_build_request_merges_passthrough_fields() {
        let options = SubmissionOptions::from_address(UNLOCKED)
            .with_value(U256::from(5))
            .with_gas_price(1_000_000_000)
            .with_nonce(9)
            .with_chain_id(56);
        let mode = SigningMode::resolve(&options).unwrap();
        let request = mode.build_request(&call(), &options);

        assert_eq!(request.from, Some(UNLOCKED));
        assert_eq!(request.to, Some(call().destination.into()));
        assert_eq!(request.input.input(), Some(&call().payload));
        assert_eq!(request.value, Some(U256::from(5)));
        assert_eq!(request.gas_price, Some(1_000_000_000));
        assert_eq!(request.nonce, Some(9));
        assert_eq!(request.chain_id, Some(56));
        assert_eq!(request.gas, None);
    }

    #[test]
    fn test_options_debug_redacts_key() {
        let options = SubmissionOptions::from_private_key(PRIVATE_KEY);
        let debug = format!("{:?}", options);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("1aba4883"));
    }
}
