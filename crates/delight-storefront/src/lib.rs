//! Cart synchronization and checkout orchestration for the
//! FoodDelights storefront.
//!
//! This crate is the headless coordination core behind the browsing
//! UI. The rendering layer subscribes to its watch channels and
//! drains its notice stream; everything stateful lives here:
//!
//! - **CartStore**: the UI's copy of the cart, optimistically mutated
//!   and reconciled with the remote cart service by refetch
//! - **CartBadge**: the always-visible item count, derived from the
//!   store
//! - **CheckoutOrchestrator**: the sequential payment handshake
//!   (key, order, widget callback)
//! - **SuccessFlowController**: the timed post-purchase overlay and
//!   its confetti effect
//! - **CartEvents**: the process-wide cart-changed broadcast
//!
//! Scheduling is cooperative and event driven: suspension points are
//! exactly the awaited network calls and timer ticks, and no ordering
//! is promised between independently issued cart mutations.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use delight_storefront::prelude::*;
//!
//! # async fn run() -> Result<(), delight_storefront::StorefrontError> {
//! let config = StorefrontConfig::default();
//! let (notices, mut notice_stream) = delight_storefront::notices::channel();
//! let events = CartEvents::new();
//!
//! let api = Arc::new(HttpCartClient::new(&config)?);
//! let store = Arc::new(CartStore::new(api, events.clone(), notices.clone()));
//! let refresh = store.spawn_refresh();
//!
//! store.load().await?;
//! let badge = CartBadge::new(&store);
//! println!("{} items in cart", badge.count());
//!
//! refresh.abort();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod badge;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod notices;
pub mod panel;
pub mod store;
pub mod success;

pub use error::StorefrontError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{
        CartApi, CheckoutOptions, HttpCartClient, HttpPaymentGateway, PaymentGateway,
        PaymentWidget, WidgetOutcome,
    };
    pub use crate::badge::CartBadge;
    pub use crate::checkout::{CheckoutOrchestrator, CheckoutState, PaymentSession};
    pub use crate::config::StorefrontConfig;
    pub use crate::error::StorefrontError;
    pub use crate::events::{CartEvent, CartEvents};
    pub use crate::notices::{Notice, NoticeLevel, NoticeSink, NoticeStream};
    pub use crate::panel::CartPanel;
    pub use crate::store::{AddOutcome, CartStore, MutationOutcome};
    pub use crate::success::{ConfettiBurst, SuccessFlowController, SuccessFlowState};

    pub use delight_commerce::prelude::*;
}
