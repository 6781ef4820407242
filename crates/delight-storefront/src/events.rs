//! Cart-changed broadcast.
//!
//! Any component that mutates the remote cart emits a payload-less
//! signal here; the cart store subscribes and reloads. An explicit
//! channel rather than ambient global state, so producers and
//! consumers are both injected with the same handle.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// The one cross-component signal: the remote cart changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The remote cart was mutated; subscribers should refetch.
    Updated,
}

/// Process-wide cart event channel. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct CartEvents {
    tx: broadcast::Sender<CartEvent>,
}

impl CartEvents {
    /// Create a new event channel.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announce that the remote cart changed. A signal with no
    /// listeners is dropped silently.
    pub fn emit(&self) {
        let _ = self.tx.send(CartEvent::Updated);
    }

    /// Subscribe to cart-changed signals.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.tx.subscribe()
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_all_subscribers() {
        let events = CartEvents::new();
        let mut a = events.subscribe();
        let mut b = events.clone().subscribe();

        events.emit();

        assert_eq!(a.recv().await.unwrap(), CartEvent::Updated);
        assert_eq!(b.recv().await.unwrap(), CartEvent::Updated);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let events = CartEvents::new();
        events.emit();
    }
}
