//! Always-visible cart badge count.

use delight_commerce::cart::CartItem;
use tokio::sync::watch;

use crate::store::CartStore;

/// Pure derivation of the badge number: the sum of quantities over
/// the store's current items, recomputed on every change. No state of
/// its own and no failure modes.
#[derive(Debug)]
pub struct CartBadge {
    items: watch::Receiver<Vec<CartItem>>,
}

impl CartBadge {
    /// Attach a badge to a store.
    pub fn new(store: &CartStore) -> Self {
        Self {
            items: store.subscribe(),
        }
    }

    /// The current badge count.
    pub fn count(&self) -> i64 {
        self.items.borrow().iter().map(|i| i.quantity).sum()
    }

    /// Wait until the underlying item list changes. Errors only when
    /// the store is gone.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.items.changed().await
    }
}
