//! Unified submission lifecycle.
//!
//! A [`LifecycleHandle`] is returned for every submission regardless of
//! whether the transaction was signed locally or by an unlocked node account.
//! It is both a future resolving to the receipt and a source of ordered
//! lifecycle events:
//!
//! ```text
//! Sending → Sent → TransactionHash → Receipt → Confirmation*
//!                      (Error may replace any later stage)
//! ```
//!
//! The event channel is created before the submission task starts and the
//! ledger writes into it directly, so nothing emitted is lost to a late
//! listener.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use alloy::primitives::{Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use futures_util::Stream;
use tokio::sync::{mpsc, oneshot};

use crate::blockchain::types::BlockchainError;
use crate::error::{Error, Result};

/// What was handed to the node.
#[derive(Debug, Clone)]
pub enum SubmittedPayload {
    /// Unsigned request for an unlocked node account.
    Request(TransactionRequest),
    /// EIP-2718 encoded signed transaction.
    Raw(Bytes),
}

/// A single lifecycle notification.
#[derive(Debug, Clone)]
pub enum LifecycleEvent<R> {
    /// The payload is about to be sent.
    Sending(SubmittedPayload),
    /// The payload was accepted by the transport.
    Sent(SubmittedPayload),
    /// The node assigned a transaction hash.
    TransactionHash(TxHash),
    /// The transaction was mined.
    Receipt(R),
    /// A further block was mined on top of the receipt's block.
    Confirmation { confirmations: u64, receipt: R },
    /// The submission failed; no further events follow.
    Error(Error),
}

/// Names of the lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    Sending,
    Sent,
    TransactionHash,
    Receipt,
    Confirmation,
    Error,
}

impl LifecycleEventKind {
    /// Wire name of the notification.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::TransactionHash => "transactionHash",
            Self::Receipt => "receipt",
            Self::Confirmation => "confirmation",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<R> LifecycleEvent<R> {
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            Self::Sending(_) => LifecycleEventKind::Sending,
            Self::Sent(_) => LifecycleEventKind::Sent,
            Self::TransactionHash(_) => LifecycleEventKind::TransactionHash,
            Self::Receipt(_) => LifecycleEventKind::Receipt,
            Self::Confirmation { .. } => LifecycleEventKind::Confirmation,
            Self::Error(_) => LifecycleEventKind::Error,
        }
    }
}

/// Write side of a lifecycle event channel, handed to the ledger.
///
/// Emitting never fails: once every listener has detached events are dropped.
#[derive(Debug)]
pub struct EventSink<R> {
    tx: mpsc::UnboundedSender<LifecycleEvent<R>>,
}

impl<R> Clone for EventSink<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R> EventSink<R> {
    /// Create a sink and the stream that receives from it.
    pub fn channel() -> (Self, LifecycleEvents<R>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, LifecycleEvents { rx })
    }

    pub fn emit(&self, event: LifecycleEvent<R>) {
        let _ = self.tx.send(event);
    }

    /// True once every listener has been dropped.
    pub fn is_detached(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Ordered stream of lifecycle events. Ends once the submission and any
/// confirmation watcher have finished.
#[derive(Debug)]
pub struct LifecycleEvents<R> {
    rx: mpsc::UnboundedReceiver<LifecycleEvent<R>>,
}

impl<R> LifecycleEvents<R> {
    /// Next event, or `None` once the sequence is over.
    pub async fn next_event(&mut self) -> Option<LifecycleEvent<R>> {
        self.rx.recv().await
    }

    /// Skip ahead to the next event of `kind`.
    pub async fn next_of(&mut self, kind: LifecycleEventKind) -> Option<LifecycleEvent<R>> {
        while let Some(event) = self.rx.recv().await {
            if event.kind() == kind {
                return Some(event);
            }
        }
        None
    }
}

impl<R> Stream for LifecycleEvents<R> {
    type Item = LifecycleEvent<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Awaitable outcome of a submission.
#[derive(Debug)]
pub struct LifecycleOutcome<R> {
    rx: oneshot::Receiver<Result<R>>,
}

impl<R> LifecycleOutcome<R> {
    pub(crate) fn channel() -> (oneshot::Sender<Result<R>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl<R> Future for LifecycleOutcome<R> {
    type Output = Result<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(BlockchainError::Aborted.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Handle for one submission: awaitable to the receipt and carrying the
/// event stream.
#[derive(Debug)]
pub struct LifecycleHandle<R> {
    events: LifecycleEvents<R>,
    outcome: LifecycleOutcome<R>,
}

impl<R> LifecycleHandle<R> {
    pub(crate) fn new(events: LifecycleEvents<R>, outcome: LifecycleOutcome<R>) -> Self {
        Self { events, outcome }
    }

    /// Next lifecycle event.
    pub async fn next_event(&mut self) -> Option<LifecycleEvent<R>> {
        self.events.next_event().await
    }

    /// Mutable access to the event stream while keeping the handle awaitable.
    pub fn events(&mut self) -> &mut LifecycleEvents<R> {
        &mut self.events
    }

    /// Separate the event stream from the outcome so both can be driven
    /// concurrently.
    pub fn split(self) -> (LifecycleEvents<R>, LifecycleOutcome<R>) {
        (self.events, self.outcome)
    }
}

impl<R> Future for LifecycleHandle<R> {
    type Output = Result<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.outcome).poll(cx)
    }
}
