//! Scoped publish/subscribe over a broadcast channel.
//!
//! Components announce state changes here instead of on global listeners. Each
//! [`EventBus::subscribe`] hands out its own receiver; dropping the receiver is
//! the unsubscribe.

use tokio::sync::broadcast;
use tracing::trace;

/// Notices a slow subscriber may fall behind by before it starts lagging.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Deliver `event` to every live subscriber. Returns how many received it.
    pub fn publish(&self, event: E) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => {
                trace!("Event published with no subscribers");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[test]
    fn delivers_to_live_subscribers() {
        let bus = EventBus::<u32>::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(1), 2);
        assert_eq!(bus.publish(2), 2);

        assert_eq!(first.try_recv().unwrap(), 1);
        assert_eq!(first.try_recv().unwrap(), 2);
        assert_eq!(second.try_recv().unwrap(), 1);
    }

    #[test]
    fn dropping_receiver_unsubscribes() {
        let bus = EventBus::<()>::new();
        let rx = bus.subscribe();
        assert_eq!(bus.publish(()), 1);

        drop(rx);
        assert_eq!(bus.publish(()), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::<u8>::new();
        bus.publish(1);
        let mut rx = bus.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn slow_subscriber_lags_instead_of_blocking() {
        let bus = EventBus::<u8>::with_capacity(2);
        let mut rx = bus.subscribe();
        for i in 0..4 {
            bus.publish(i);
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(2))));
        assert_eq!(rx.try_recv().unwrap(), 2);
    }

    #[test]
    fn dropping_bus_closes_receivers() {
        let bus = EventBus::<u8>::new();
        let mut rx = bus.subscribe();
        drop(bus);
        assert!(matches!(
            tokio_test::block_on(rx.recv()),
            Err(RecvError::Closed)
        ));
    }
}
