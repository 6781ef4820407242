//! Checkout orchestration.
//!
//! Drives the three-step payment handshake: fetch the gateway's
//! public key, create a payment order for the cart total, then open
//! the payment widget and wait for its callback. The steps are
//! strictly sequential; each one blocks the next. Every invocation
//! starts a fresh [`PaymentSession`]; nothing survives between
//! attempts.

use std::sync::Arc;

use delight_commerce::ids::{OrderId, PaymentId};
use delight_commerce::money::Money;
use tracing::{error, info, warn};

use crate::api::{CheckoutOptions, PaymentGateway, PaymentWidget, WidgetOutcome};
use crate::notices::NoticeSink;
use crate::panel::CartPanel;
use crate::store::CartStore;
use crate::success::SuccessFlowController;

/// Merchant name shown in the payment widget.
pub const MERCHANT_NAME: &str = "FoodDelights";

/// Progress of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing issued yet.
    Idle,
    /// Waiting for the gateway public key.
    KeyRequested,
    /// Waiting for the gateway to create the order.
    OrderRequested,
    /// The widget is open, waiting for its callback.
    WidgetOpen,
    /// The callback reported a non-empty payment id.
    Succeeded,
    /// Any step failed or the widget closed without completing.
    Abandoned,
}

/// One checkout attempt's transient data. Created per attempt,
/// discarded once it resolves, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSession {
    /// Amount to charge.
    pub amount: Money,
    /// Gateway public key, once fetched.
    pub key: Option<String>,
    /// Gateway-issued order id, once created.
    pub order_id: Option<OrderId>,
    /// Payment id from the widget callback, on success only.
    pub payment_id: Option<PaymentId>,
    /// Where the attempt currently stands.
    pub state: CheckoutState,
}

impl PaymentSession {
    fn new(amount: Money) -> Self {
        Self {
            amount,
            key: None,
            order_id: None,
            payment_id: None,
            state: CheckoutState::Idle,
        }
    }

    /// Whether the attempt ended in payment.
    pub fn succeeded(&self) -> bool {
        self.state == CheckoutState::Succeeded
    }
}

/// Orchestrates the payment handshake and the post-payment handoff.
pub struct CheckoutOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    widget: Arc<dyn PaymentWidget>,
    store: Arc<CartStore>,
    panel: Arc<CartPanel>,
    success: Arc<SuccessFlowController>,
    notices: NoticeSink,
}

impl CheckoutOrchestrator {
    /// Wire up an orchestrator.
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        widget: Arc<dyn PaymentWidget>,
        store: Arc<CartStore>,
        panel: Arc<CartPanel>,
        success: Arc<SuccessFlowController>,
        notices: NoticeSink,
    ) -> Self {
        Self {
            gateway,
            widget,
            store,
            panel,
            success,
            notices,
        }
    }

    /// Run one checkout attempt for the cart's current total.
    ///
    /// On success the cart is cleared, the cart panel closes and the
    /// success overlay starts. On failure the attempt ends in
    /// [`CheckoutState::Abandoned`] with a diagnostic log and an
    /// error notice for the shopper.
    pub async fn checkout(&self) -> PaymentSession {
        let totals = match self.store.totals() {
            Ok(totals) => totals,
            Err(err) => {
                let session = PaymentSession::new(Money::default());
                return self.abandon(session, "cart totals unavailable", &err);
            }
        };

        let mut session = PaymentSession::new(totals.total_price);
        if totals.item_count == 0 || totals.total_price.is_zero() {
            warn!("checkout refused: cart is empty");
            self.notices.info("Your cart is empty");
            return session;
        }

        session.state = CheckoutState::KeyRequested;
        let key = match self.gateway.fetch_key().await {
            Ok(key) => key,
            Err(err) => return self.abandon(session, "gateway key fetch failed", &err),
        };
        session.key = Some(key.clone());

        session.state = CheckoutState::OrderRequested;
        let order_id = match self.gateway.create_order(session.amount).await {
            Ok(order_id) => order_id,
            Err(err) => return self.abandon(session, "order creation failed", &err),
        };
        session.order_id = Some(order_id.clone());

        session.state = CheckoutState::WidgetOpen;
        let options = CheckoutOptions {
            key,
            amount: session.amount,
            currency: session.amount.currency,
            order_id,
            merchant_name: MERCHANT_NAME.to_string(),
            description: "Secure online payment".to_string(),
        };

        match self.widget.open(options).await {
            Ok(WidgetOutcome::Completed { payment_id }) if !payment_id.is_empty() => {
                info!(payment = %payment_id, "payment completed");
                session.payment_id = Some(payment_id);
                session.state = CheckoutState::Succeeded;

                self.store.clear().await;
                self.panel.close();
                self.success.start();
                session
            }
            Ok(_) => {
                warn!("widget closed without a payment id");
                self.notices.error("Payment could not be completed");
                session.state = CheckoutState::Abandoned;
                session
            }
            Err(err) => self.abandon(session, "payment widget failed", &err),
        }
    }

    fn abandon(
        &self,
        mut session: PaymentSession,
        context: &str,
        err: &dyn std::fmt::Display,
    ) -> PaymentSession {
        error!(error = %err, "checkout abandoned: {context}");
        self.notices.error("Payment could not be completed");
        session.state = CheckoutState::Abandoned;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockCartApi, MockPaymentGateway, MockPaymentWidget};
    use crate::events::CartEvents;
    use crate::notices::{self, NoticeLevel};
    use crate::success::SuccessFlowState;
    use delight_commerce::cart::CartItem;
    use delight_commerce::ids::ItemId;
    use delight_commerce::money::{Currency, Money};

    fn cart_api_with_items() -> MockCartApi {
        let mut api = MockCartApi::new();
        api.expect_clear_cart().returning(|| Ok(()));
        api
    }

    fn seeded_store(api: MockCartApi) -> (Arc<CartStore>, NoticeSink, notices::NoticeStream) {
        let (sink, stream) = notices::channel();
        let store = Arc::new(CartStore::new(Arc::new(api), CartEvents::new(), sink.clone()));
        (store, sink, stream)
    }

    fn orchestrator(
        gateway: MockPaymentGateway,
        widget: MockPaymentWidget,
        store: Arc<CartStore>,
        sink: NoticeSink,
    ) -> (
        CheckoutOrchestrator,
        Arc<CartPanel>,
        Arc<SuccessFlowController>,
    ) {
        let panel = Arc::new(CartPanel::new());
        let success = Arc::new(SuccessFlowController::new());
        let orchestrator = CheckoutOrchestrator::new(
            Arc::new(gateway),
            Arc::new(widget),
            store,
            Arc::clone(&panel),
            Arc::clone(&success),
            sink,
        );
        (orchestrator, panel, success)
    }

    #[tokio::test]
    async fn test_empty_cart_refuses_checkout() {
        let (store, sink, mut stream) = seeded_store(MockCartApi::new());
        let (orchestrator, _, _) =
            orchestrator(MockPaymentGateway::new(), MockPaymentWidget::new(), store, sink);

        let session = orchestrator.checkout().await;
        assert_eq!(session.state, CheckoutState::Idle);
        assert_eq!(stream.try_next().unwrap().level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart_and_starts_success_flow() {
        let mut api = cart_api_with_items();
        api.expect_fetch_cart().returning(|| {
            Ok(vec![CartItem::new(
                ItemId::new("a"),
                "Paneer Tikka",
                2,
                Money::new(10000, Currency::INR),
                Money::new(9000, Currency::INR),
            )
            .unwrap()])
        });
        let (store, sink, _stream) = seeded_store(api);
        store.load().await.unwrap();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_fetch_key()
            .returning(|| Ok("rzp_test_key".to_string()));
        gateway
            .expect_create_order()
            // 2 x ₹90.00
            .withf(|amount| *amount == Money::new(18000, Currency::INR))
            .returning(|_| Ok(OrderId::new("order_1")));

        let mut widget = MockPaymentWidget::new();
        widget.expect_open().returning(|options| {
            assert_eq!(options.currency, Currency::INR);
            assert_eq!(options.order_id, OrderId::new("order_1"));
            assert_eq!(options.merchant_name, MERCHANT_NAME);
            Ok(WidgetOutcome::Completed {
                payment_id: PaymentId::new("pay_42"),
            })
        });

        let (orchestrator, panel, success) = orchestrator(gateway, widget, store.clone(), sink);
        panel.open();

        let session = orchestrator.checkout().await;
        assert!(session.succeeded());
        assert_eq!(session.payment_id, Some(PaymentId::new("pay_42")));
        assert!(store.items().is_empty());
        assert!(!panel.is_open());
        assert_eq!(success.state(), SuccessFlowState::Visible { countdown: 10 });
    }

    #[tokio::test]
    async fn test_key_failure_abandons_with_notice() {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart().returning(|| {
            Ok(vec![CartItem::new(
                ItemId::new("a"),
                "Paneer Tikka",
                1,
                Money::new(10000, Currency::INR),
                Money::new(9000, Currency::INR),
            )
            .unwrap()])
        });
        let (store, sink, mut stream) = seeded_store(api);
        store.load().await.unwrap();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_fetch_key().returning(|| {
            Err(crate::error::StorefrontError::Http {
                status: 503,
                url: "http://gateway/getkey".to_string(),
                body: String::new(),
            })
        });

        let (orchestrator, _, success) =
            orchestrator(gateway, MockPaymentWidget::new(), store.clone(), sink);

        let session = orchestrator.checkout().await;
        assert_eq!(session.state, CheckoutState::Abandoned);
        assert_eq!(stream.try_next().unwrap().level, NoticeLevel::Error);
        // Cart untouched, no success overlay.
        assert_eq!(store.items().len(), 1);
        assert_eq!(success.state(), SuccessFlowState::Hidden);
    }

    #[tokio::test]
    async fn test_empty_payment_id_is_abandoned() {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart().returning(|| {
            Ok(vec![CartItem::new(
                ItemId::new("a"),
                "Paneer Tikka",
                1,
                Money::new(10000, Currency::INR),
                Money::new(9000, Currency::INR),
            )
            .unwrap()])
        });
        let (store, sink, mut stream) = seeded_store(api);
        store.load().await.unwrap();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_fetch_key()
            .returning(|| Ok("rzp_test_key".to_string()));
        gateway
            .expect_create_order()
            .returning(|_| Ok(OrderId::new("order_1")));

        let mut widget = MockPaymentWidget::new();
        widget.expect_open().returning(|_| {
            Ok(WidgetOutcome::Completed {
                payment_id: PaymentId::new(""),
            })
        });

        let (orchestrator, _, success) = orchestrator(gateway, widget, store.clone(), sink);

        let session = orchestrator.checkout().await;
        assert_eq!(session.state, CheckoutState::Abandoned);
        assert!(session.payment_id.is_none());
        assert_eq!(store.items().len(), 1);
        assert_eq!(success.state(), SuccessFlowState::Hidden);
        assert_eq!(stream.try_next().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_widget_dismissal_is_abandoned() {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart().returning(|| {
            Ok(vec![CartItem::new(
                ItemId::new("a"),
                "Paneer Tikka",
                1,
                Money::new(10000, Currency::INR),
                Money::new(9000, Currency::INR),
            )
            .unwrap()])
        });
        let (store, sink, _stream) = seeded_store(api);
        store.load().await.unwrap();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_fetch_key()
            .returning(|| Ok("rzp_test_key".to_string()));
        gateway
            .expect_create_order()
            .returning(|_| Ok(OrderId::new("order_1")));

        let mut widget = MockPaymentWidget::new();
        widget
            .expect_open()
            .returning(|_| Ok(WidgetOutcome::Dismissed));

        let (orchestrator, _, _) = orchestrator(gateway, widget, store, sink);

        let session = orchestrator.checkout().await;
        assert_eq!(session.state, CheckoutState::Abandoned);
        assert_eq!(session.order_id, Some(OrderId::new("order_1")));
    }
}
