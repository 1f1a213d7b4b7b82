//! In-process event bus with bounded subscriber queues.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, PublishError, Subscription};

const DEFAULT_CAPACITY: usize = 64;

/// In-process pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out to every subscriber
/// - Bounded queues with a **drop-on-full** policy: a slow consumer loses
///   messages instead of stalling publishers. Security-event publication sits
///   on the request path, so it must never wait on a sink.
#[derive(Debug)]
pub struct LocalEventBus<M> {
    subscribers: Mutex<Vec<mpsc::SyncSender<M>>>,
    capacity: usize,
}

impl<M> LocalEventBus<M> {
    pub fn new() -> Self {
        Self::bounded(DEFAULT_CAPACITY)
    }

    /// A bus whose subscriber queues hold at most `capacity` pending messages.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            capacity,
        }
    }
}

impl<M> Default for LocalEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for LocalEventBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) -> Result<(), PublishError> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| PublishError::Closed)?;

        let mut delivered = 0usize;
        let mut dropped = 0usize;

        // Drop dead subscribers while publishing; keep full ones (they just
        // miss this message).
        subs.retain(|tx| match tx.try_send(message.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(mpsc::TrySendError::Full(_)) => {
                dropped += 1;
                true
            }
            Err(mpsc::TrySendError::Disconnected(_)) => false,
        });

        if delivered == 0 && dropped > 0 {
            return Err(PublishError::Full);
        }

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::sync_channel(self.capacity);

        // A poisoned lock leaves the subscription connected to nothing; it
        // simply never receives messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_out_to_every_subscriber() {
        let bus = LocalEventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish("hello").unwrap();

        assert_eq!(a.recv().unwrap(), "hello");
        assert_eq!(b.recv().unwrap(), "hello");
    }

    #[test]
    fn drops_on_full_instead_of_blocking() {
        let bus = LocalEventBus::bounded(1);
        let sub = bus.subscribe();

        bus.publish(1u32).unwrap();
        // Queue is full; these copies are dropped but publish still returns.
        assert_eq!(bus.publish(2u32), Err(PublishError::Full));
        assert_eq!(bus.publish(3u32), Err(PublishError::Full));

        assert_eq!(sub.recv().unwrap(), 1);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn prunes_dead_subscribers() {
        let bus = LocalEventBus::new();
        drop(bus.subscribe());

        // Publishing to a bus whose only subscriber is gone is a no-op.
        bus.publish("orphan").unwrap();

        let live = bus.subscribe();
        bus.publish("seen").unwrap();
        assert_eq!(live.recv().unwrap(), "seen");
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let bus: LocalEventBus<&str> = LocalEventBus::new();
        assert_eq!(bus.publish("nobody"), Ok(()));
    }
}
