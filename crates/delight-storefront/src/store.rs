//! The cart store: single source of truth for the rendered cart.
//!
//! The store holds the UI's copy of the cart and reconciles it with
//! the remote cart service. Quantity updates and deletions apply
//! locally first (optimistic mutation); when the remote call fails,
//! recovery is a wholesale refetch of the server's state rather than
//! an inverse operation. Adds are not optimistic: the list only
//! reflects a new item after the next load, triggered by the
//! cart-changed broadcast.
//!
//! There is no cross-call sequencing. Two mutations issued in quick
//! succession race independently and the last write to land wins,
//! which is acceptable for a single-shopper cart.

use std::collections::HashSet;
use std::sync::Arc;

use delight_commerce::cart::{CartItem, CartTotals, CategoryDiscounts, NewCartItem};
use delight_commerce::catalog::Product;
use delight_commerce::ids::{ItemId, ProductId};
use delight_commerce::CommerceError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::api::CartApi;
use crate::error::StorefrontError;
use crate::events::{CartEvent, CartEvents};
use crate::notices::NoticeSink;

/// Terminal state of an optimistic mutation.
///
/// Reconciliation is a first-class transition: a failed remote call
/// resolves by reloading the server's cart, and callers can observe
/// that it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The remote call confirmed the local mutation.
    Committed,
    /// The remote call failed; local state was replaced by a reload.
    ReconciledViaReload,
    /// The mutation was rejected locally and nothing was issued.
    Rejected,
}

/// Outcome of an add, which is never optimistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The service created the item.
    Added,
    /// The service answered 400: an item with that name exists.
    AlreadyExists,
    /// The add failed for any other reason.
    Failed,
}

/// Holds the cart the UI renders and keeps it converging with the
/// remote cart service.
pub struct CartStore {
    api: Arc<dyn CartApi>,
    items: watch::Sender<Vec<CartItem>>,
    adding: watch::Sender<HashSet<ProductId>>,
    events: CartEvents,
    notices: NoticeSink,
}

impl CartStore {
    /// Create an empty store.
    pub fn new(api: Arc<dyn CartApi>, events: CartEvents, notices: NoticeSink) -> Self {
        let (items, _) = watch::channel(Vec::new());
        let (adding, _) = watch::channel(HashSet::new());
        Self {
            api,
            items,
            adding,
            events,
            notices,
        }
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<CartItem> {
        self.items.borrow().clone()
    }

    /// Observe every change to the item list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.items.subscribe()
    }

    /// Totals derived from the current items, always recomputed.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        CartTotals::compute(&self.items.borrow())
    }

    /// Whether an add for this product is currently in flight.
    pub fn is_adding(&self, product: &ProductId) -> bool {
        self.adding.borrow().contains(product)
    }

    /// Observe the in-flight add set (drives per-item spinners).
    pub fn subscribe_adding(&self) -> watch::Receiver<HashSet<ProductId>> {
        self.adding.subscribe()
    }

    /// Replace local state wholesale with the remote cart.
    ///
    /// Called on startup and whenever a cart-changed signal arrives.
    pub async fn load(&self) -> Result<(), StorefrontError> {
        let items = self.api.fetch_cart().await?;
        debug!(count = items.len(), "cart loaded from server");
        self.items.send_replace(items);
        Ok(())
    }

    /// Add a catalog product to the remote cart, capturing the
    /// category discount now.
    ///
    /// No local mutation happens here: the item list reflects the new
    /// item only after the next [`load`](Self::load), which the
    /// cart-changed broadcast triggers on success. The shopper sees a
    /// notice either way, and an informational (not error) one when
    /// the item already exists.
    pub async fn add(&self, product: &Product, discounts: &CategoryDiscounts) -> AddOutcome {
        self.adding.send_modify(|set| {
            set.insert(product.id.clone());
        });

        let outcome = match NewCartItem::from_product(product, discounts) {
            Ok(draft) => match self.api.add_item(&draft).await {
                Ok(response) => {
                    self.notices.success(
                        response
                            .message
                            .unwrap_or_else(|| "Item added to cart successfully".to_string()),
                    );
                    self.events.emit();
                    AddOutcome::Added
                }
                Err(err) if err.is_duplicate_item() => {
                    self.notices.info(
                        err.response_body()
                            .unwrap_or("Item already exists in cart"),
                    );
                    AddOutcome::AlreadyExists
                }
                Err(err) => {
                    error!(product = %product.name, error = %err, "add to cart failed");
                    self.notices.error("Failed to add item to cart");
                    AddOutcome::Failed
                }
            },
            Err(err) => {
                error!(product = %product.name, error = %err, "invalid cart item");
                self.notices.error("Failed to add item to cart");
                AddOutcome::Failed
            }
        };

        self.adding.send_modify(|set| {
            set.remove(&product.id);
        });
        outcome
    }

    /// Set an item's quantity: optimistic local mutation, then the
    /// remote update. Quantities below 1 are rejected untouched.
    pub async fn update_quantity(&self, id: &ItemId, quantity: i64) -> MutationOutcome {
        if quantity < 1 {
            return MutationOutcome::Rejected;
        }

        let found = self.items.send_if_modified(|items| {
            match items.iter_mut().find(|i| &i.id == id) {
                Some(item) => {
                    item.quantity = quantity;
                    true
                }
                None => false,
            }
        });
        if !found {
            return MutationOutcome::Rejected;
        }

        match self.api.update_quantity(id, quantity).await {
            Ok(()) => MutationOutcome::Committed,
            Err(err) => {
                warn!(item = %id, error = %err, "quantity update failed, reloading cart");
                self.notices.error("Could not update quantity, cart refreshed");
                self.reconcile().await
            }
        }
    }

    /// Delete an item by name: optimistic local removal, then the
    /// remote delete. Any remote failure reconciles via reload.
    pub async fn delete(&self, name: &str) -> MutationOutcome {
        self.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|i| i.name != name);
            items.len() < before
        });

        match self.api.delete_item(name).await {
            Ok(()) => MutationOutcome::Committed,
            Err(err) => {
                warn!(item = name, error = %err, "delete failed, reloading cart");
                self.notices.error("Could not remove item, cart refreshed");
                self.reconcile().await
            }
        }
    }

    /// Empty the cart locally and issue a remote clear.
    ///
    /// Fire-and-forget: a failed remote clear is logged but not
    /// resynchronized; the stale remote cart resurfaces on the next
    /// load. Accepted risk for the post-payment path, where the order
    /// already went through.
    pub async fn clear(&self) {
        self.items.send_replace(Vec::new());
        if let Err(err) = self.api.clear_cart().await {
            error!(error = %err, "remote cart clear failed");
        }
    }

    /// Named recovery transition: refetch authoritative state.
    async fn reconcile(&self) -> MutationOutcome {
        if let Err(err) = self.load().await {
            warn!(error = %err, "reload after failed mutation also failed");
        }
        MutationOutcome::ReconciledViaReload
    }

    /// Spawn the background task that reloads the cart whenever a
    /// cart-changed signal arrives. Abort the handle on teardown.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut rx = store.events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(CartEvent::Updated) => {
                        if let Err(err) = store.load().await {
                            warn!(error = %err, "cart refresh failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "cart events lagged, refetching once");
                        if let Err(err) = store.load().await {
                            warn!(error = %err, "cart refresh failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AddItemResponse, MockCartApi};
    use crate::notices::{self, NoticeLevel};
    use delight_commerce::money::{Currency, Money};
    use mockall::predicate::eq;

    fn item(id: &str, name: &str, quantity: i64, discount_cents: i64) -> CartItem {
        CartItem::new(
            ItemId::new(id),
            name,
            quantity,
            Money::new(discount_cents, Currency::INR),
            Money::new(discount_cents, Currency::INR),
        )
        .unwrap()
    }

    fn paneer_product() -> Product {
        Product {
            id: ProductId::new("12"),
            name: "Paneer Tikka".to_string(),
            description: "Chargrilled paneer".to_string(),
            image: "paneer.jpg".to_string(),
            price: Money::new(10000, Currency::INR),
            category: "Appetizer".to_string(),
            rating: None,
        }
    }

    fn store_with(api: MockCartApi) -> (CartStore, notices::NoticeStream) {
        let (sink, stream) = notices::channel();
        let store = CartStore::new(Arc::new(api), CartEvents::new(), sink);
        (store, stream)
    }

    #[tokio::test]
    async fn test_load_replaces_state_wholesale() {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart()
            .returning(|| Ok(vec![item("a", "Paneer Tikka", 2, 9000)]));
        let (store, _notices) = store_with(api);

        store.load().await.unwrap();
        assert_eq!(store.items().len(), 1);
        let totals = store.totals().unwrap();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_price, Money::new(18000, Currency::INR));
    }

    #[tokio::test]
    async fn test_update_quantity_below_one_is_noop() {
        let api = MockCartApi::new(); // no remote call expected
        let (store, _notices) = store_with(api);
        store
            .items
            .send_replace(vec![item("a", "Paneer Tikka", 2, 9000)]);

        assert_eq!(
            store.update_quantity(&ItemId::new("a"), 0).await,
            MutationOutcome::Rejected
        );
        assert_eq!(
            store.update_quantity(&ItemId::new("a"), -1).await,
            MutationOutcome::Rejected
        );
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_update_quantity_optimistic_commit() {
        let mut api = MockCartApi::new();
        api.expect_update_quantity()
            .with(eq(ItemId::new("a")), eq(5))
            .returning(|_, _| Ok(()));
        let (store, _notices) = store_with(api);
        store
            .items
            .send_replace(vec![item("a", "Paneer Tikka", 2, 9000)]);

        let outcome = store.update_quantity(&ItemId::new("a"), 5).await;
        assert_eq!(outcome, MutationOutcome::Committed);

        // 5 x ₹90.00 = ₹450.00
        let totals = store.totals().unwrap();
        assert_eq!(totals.total_price, Money::new(45000, Currency::INR));
    }

    #[tokio::test]
    async fn test_update_failure_reconciles_via_reload() {
        let mut api = MockCartApi::new();
        api.expect_update_quantity().returning(|_, _| {
            Err(StorefrontError::Http {
                status: 500,
                url: "http://cart/update".to_string(),
                body: String::new(),
            })
        });
        // The server still has quantity 2.
        api.expect_fetch_cart()
            .times(1)
            .returning(|| Ok(vec![item("a", "Paneer Tikka", 2, 9000)]));
        let (store, mut notices) = store_with(api);
        store
            .items
            .send_replace(vec![item("a", "Paneer Tikka", 2, 9000)]);

        let outcome = store.update_quantity(&ItemId::new("a"), 5).await;
        assert_eq!(outcome, MutationOutcome::ReconciledViaReload);
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(notices.try_next().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_delete_removes_locally_then_remotely() {
        let mut api = MockCartApi::new();
        api.expect_delete_item()
            .with(eq("Paneer Tikka"))
            .times(1)
            .returning(|_| Ok(()));
        let (store, _notices) = store_with(api);
        store.items.send_replace(vec![
            item("a", "Paneer Tikka", 2, 9000),
            item("b", "Gulab Jamun", 1, 5000),
        ]);

        let outcome = store.delete("Paneer Tikka").await;
        assert_eq!(outcome, MutationOutcome::Committed);
        assert!(store.items().iter().all(|i| i.name != "Paneer Tikka"));
    }

    #[tokio::test]
    async fn test_delete_failure_converges_to_server_state() {
        let mut api = MockCartApi::new();
        api.expect_delete_item().returning(|_| {
            Err(StorefrontError::Http {
                status: 502,
                url: "http://cart/delete".to_string(),
                body: String::new(),
            })
        });
        api.expect_fetch_cart()
            .times(1)
            .returning(|| Ok(vec![item("a", "Paneer Tikka", 2, 9000)]));
        let (store, _notices) = store_with(api);
        store
            .items
            .send_replace(vec![item("a", "Paneer Tikka", 2, 9000)]);

        let outcome = store.delete("Paneer Tikka").await;
        assert_eq!(outcome, MutationOutcome::ReconciledViaReload);
        // Local state is exactly the server's again.
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_add_success_emits_cart_changed() {
        let mut api = MockCartApi::new();
        api.expect_add_item().times(1).returning(|_| {
            Ok(AddItemResponse {
                message: Some("Item added to cart".to_string()),
            })
        });
        let (sink, mut notices) = notices::channel();
        let events = CartEvents::new();
        let mut rx = events.subscribe();
        let store = CartStore::new(Arc::new(api), events, sink);

        let outcome = store
            .add(&paneer_product(), &CategoryDiscounts::new())
            .await;
        assert_eq!(outcome, AddOutcome::Added);
        // No local mutation from add itself.
        assert!(store.items().is_empty());
        assert_eq!(rx.recv().await.unwrap(), CartEvent::Updated);

        let notice = notices.try_next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Item added to cart");
    }

    #[tokio::test]
    async fn test_add_duplicate_yields_info_notice() {
        let mut api = MockCartApi::new();
        api.expect_add_item().returning(|_| {
            Err(StorefrontError::Http {
                status: 400,
                url: "http://cart/add".to_string(),
                body: "Item already exists in cart".to_string(),
            })
        });
        let (store, mut notices) = store_with(api);

        let outcome = store
            .add(&paneer_product(), &CategoryDiscounts::new())
            .await;
        assert_eq!(outcome, AddOutcome::AlreadyExists);

        let notice = notices.try_next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Item already exists in cart");
    }

    #[tokio::test]
    async fn test_add_other_failure_yields_error_notice() {
        let mut api = MockCartApi::new();
        api.expect_add_item().returning(|_| {
            Err(StorefrontError::Http {
                status: 500,
                url: "http://cart/add".to_string(),
                body: String::new(),
            })
        });
        let (store, mut notices) = store_with(api);

        let outcome = store
            .add(&paneer_product(), &CategoryDiscounts::new())
            .await;
        assert_eq!(outcome, AddOutcome::Failed);
        assert_eq!(notices.try_next().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_adding_flag_cleared_after_add() {
        let mut api = MockCartApi::new();
        api.expect_add_item()
            .returning(|_| Ok(AddItemResponse::default()));
        let (store, _notices) = store_with(api);

        let product = paneer_product();
        assert!(!store.is_adding(&product.id));
        store.add(&product, &CategoryDiscounts::new()).await;
        assert!(!store.is_adding(&product.id));
    }

    #[tokio::test]
    async fn test_clear_is_fire_and_forget() {
        let mut api = MockCartApi::new();
        api.expect_clear_cart().times(1).returning(|| {
            Err(StorefrontError::Http {
                status: 500,
                url: "http://cart/clear".to_string(),
                body: String::new(),
            })
        });
        let (store, mut notices) = store_with(api);
        store
            .items
            .send_replace(vec![item("a", "Paneer Tikka", 2, 9000)]);

        store.clear().await;
        // Local cart is empty even though the remote clear failed,
        // and no reload was issued.
        assert!(store.items().is_empty());
        assert!(notices.try_next().is_none());
    }

    #[tokio::test]
    async fn test_refresh_task_reloads_on_event() {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart()
            .returning(|| Ok(vec![item("a", "Paneer Tikka", 1, 9000)]));
        let (sink, _stream) = notices::channel();
        let events = CartEvents::new();
        let store = Arc::new(CartStore::new(Arc::new(api), events.clone(), sink));

        let mut rx = store.subscribe();
        let task = store.spawn_refresh();

        events.emit();
        rx.changed().await.unwrap();
        assert_eq!(store.items().len(), 1);

        task.abort();
    }
}
