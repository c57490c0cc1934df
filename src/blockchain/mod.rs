//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! PendingCall + SubmissionOptions
//!     → transaction.rs (signing mode, gas estimate × 1.2)
//!     → wallet.rs (account derivation, when a private key is given)
//!     → ledger.rs trait, implemented over JSON-RPC by client.rs
//!     → lifecycle.rs (one handle: events + awaited receipt)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - No internal retries; failures are reported to the caller

pub mod client;
pub mod ledger;
pub mod lifecycle;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use ledger::Ledger;
pub use lifecycle::{
    EventSink, LifecycleEvent, LifecycleEventKind, LifecycleEvents, LifecycleHandle,
    LifecycleOutcome, SubmittedPayload,
};
pub use transaction::{apply_gas_margin, PendingCall, SigningMode, SubmissionOptions, Transaction};
pub use types::{BlockchainError, ChainId};
pub use wallet::{Account, Accounts};
