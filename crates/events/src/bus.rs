//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is intentionally lightweight:
//!
//! - **Transport-agnostic**: in-process channels today, a broker tomorrow.
//! - **Best-effort delivery**: a consumer that cannot keep up loses messages;
//!   the bus is for observation, not for state of record.
//! - **Never on the hot path**: `publish` must not block, and a failed
//!   publication must never surface to the request that triggered it.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Why a publication did not reach a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// Every subscriber queue was full; the message was dropped.
    Full,
    /// The bus can no longer accept messages (internal state unusable).
    Closed,
}

/// A subscription to an event stream.
///
/// Each subscription gets its own copy of every published message (broadcast
/// semantics) and is meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ## Delivery guarantees
///
/// Best-effort broadcast. `publish` never blocks; a subscriber whose queue is
/// full simply misses that message. Callers that treat events as
/// fire-and-forget should ignore the returned `Result` entirely.
pub trait EventBus<M>: Send + Sync {
    fn publish(&self, message: M) -> Result<(), PublishError>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    fn publish(&self, message: M) -> Result<(), PublishError> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
