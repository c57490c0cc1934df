//! Crate-wide error type.
//!
//! Validation errors are raised synchronously before any ledger interaction.
//! Ledger failures arrive wrapped in [`Error::Blockchain`] and only ever
//! surface through a [`LifecycleHandle`](crate::blockchain::LifecycleHandle)
//! or an awaited estimate.

use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Errors returned by the 8pay client.
///
/// Every variant is `Clone` so a failure can be emitted as a lifecycle event
/// and returned from the awaited outcome at the same time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// `send` was invoked without options.
    #[error("No options provided")]
    MissingOptions,

    /// Plan id is not a 32-byte hex hash.
    #[error("{0} is not a valid plan id")]
    InvalidPlanId(String),

    /// Subscription id is not a 32-byte hex hash.
    #[error("{0} is not a valid subscription id")]
    InvalidSubscriptionId(String),

    /// Amount is not a positive integer.
    #[error("{0} is not a valid amount")]
    InvalidAmount(String),

    /// A parameter expected to be a sequence was something else.
    #[error("{0} is not an array")]
    NotAnArray(String),

    /// Two parallel sequences disagree in length.
    #[error("{0} and {1} lengths must be equal")]
    LengthMismatch(String, String),

    /// Private key could not be parsed.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Mnemonic phrase or derivation path rejected.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Registry has no address for the contract on this network.
    #[error("{contract} is not deployed on {network}")]
    ContractNotDeployed { contract: String, network: String },

    /// Token symbol or address not known for this network.
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// Neither `from` nor `private_key` was supplied.
    #[error("No sender: provide either `from` or `private_key`")]
    MissingSender,

    /// `send` was called outside a Tokio runtime.
    #[error("No Tokio runtime available to drive the submission")]
    NoRuntime,

    /// Estimation, signing, submission or network failure.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Discriminant of [`Error`], for callers that match on the failure class
/// without caring about its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingOptions,
    InvalidPlanId,
    InvalidSubscriptionId,
    InvalidAmount,
    NotAnArray,
    LengthMismatch,
    InvalidPrivateKey,
    InvalidMnemonic,
    ContractNotDeployed,
    UnknownToken,
    MissingSender,
    NoRuntime,
    Blockchain,
}

impl Error {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingOptions => ErrorKind::MissingOptions,
            Self::InvalidPlanId(_) => ErrorKind::InvalidPlanId,
            Self::InvalidSubscriptionId(_) => ErrorKind::InvalidSubscriptionId,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::NotAnArray(_) => ErrorKind::NotAnArray,
            Self::LengthMismatch(..) => ErrorKind::LengthMismatch,
            Self::InvalidPrivateKey(_) => ErrorKind::InvalidPrivateKey,
            Self::InvalidMnemonic(_) => ErrorKind::InvalidMnemonic,
            Self::ContractNotDeployed { .. } => ErrorKind::ContractNotDeployed,
            Self::UnknownToken(_) => ErrorKind::UnknownToken,
            Self::MissingSender => ErrorKind::MissingSender,
            Self::NoRuntime => ErrorKind::NoRuntime,
            Self::Blockchain(_) => ErrorKind::Blockchain,
        }
    }

    /// True for errors raised by input validation, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidPlanId
                | ErrorKind::InvalidSubscriptionId
                | ErrorKind::InvalidAmount
                | ErrorKind::NotAnArray
                | ErrorKind::LengthMismatch
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
