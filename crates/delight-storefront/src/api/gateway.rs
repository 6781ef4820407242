//! Payment gateway client and widget boundary.
//!
//! The gateway handshake has two server-side steps (public key, then
//! order creation) followed by a client-side widget invocation that
//! reports its outcome through an asynchronous callback. The widget
//! itself is external; this module only models its interface.

use async_trait::async_trait;
use delight_commerce::ids::{OrderId, PaymentId};
use delight_commerce::money::{Currency, Money};
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::cart::{check_status, join_segments, parse_base};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;

#[derive(Debug, Deserialize)]
struct KeyResponse {
    key: String,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: OrderBody,
}

#[derive(Debug, Deserialize)]
struct OrderBody {
    id: OrderId,
}

#[derive(Serialize)]
struct CreateOrderBody {
    amount: f64,
}

/// Server-side steps of the payment handshake.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the gateway's public key.
    async fn fetch_key(&self) -> Result<String, StorefrontError>;

    /// Create a payment order for the given amount, receiving the
    /// gateway-issued order identifier.
    async fn create_order(&self, amount: Money) -> Result<OrderId, StorefrontError>;
}

/// Configuration handed to the payment widget when it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    /// Gateway public key.
    pub key: String,
    /// Amount to charge.
    pub amount: Money,
    /// Charge currency.
    pub currency: Currency,
    /// Gateway-issued order identifier.
    pub order_id: OrderId,
    /// Merchant name shown in the widget.
    pub merchant_name: String,
    /// Payment description shown in the widget.
    pub description: String,
}

/// Terminal outcome reported by the widget's completion callback.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOutcome {
    /// The shopper completed payment; the gateway issued a payment id.
    Completed {
        /// The `razorpay_payment_id` from the callback.
        payment_id: PaymentId,
    },
    /// The widget was closed without completing payment.
    Dismissed,
}

/// The client-side payment widget.
///
/// Production wires the real gateway widget here; tests substitute a
/// mock reporting a canned outcome.
#[automock]
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    /// Open the widget and wait for its completion callback.
    async fn open(&self, options: CheckoutOptions) -> Result<WidgetOutcome, StorefrontError>;
}

/// [`PaymentGateway`] implementation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    http: Client,
    base: Url,
}

impl HttpPaymentGateway {
    /// Build a gateway client from the storefront configuration.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StorefrontError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let base = parse_base(&config.gateway_url)?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        join_segments(&self.base, segments)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn fetch_key(&self) -> Result<String, StorefrontError> {
        let url = self.endpoint(&["razorpay", "getkey"]);
        let response = check_status(self.http.get(url).send().await?).await?;
        let body = response.text().await?;
        let key: KeyResponse = serde_json::from_str(&body)
            .map_err(|e| StorefrontError::Deserialization(e.to_string()))?;
        Ok(key.key)
    }

    async fn create_order(&self, amount: Money) -> Result<OrderId, StorefrontError> {
        let url = self.endpoint(&["razorpay", "payment", "process"]);
        let body = CreateOrderBody {
            amount: amount.to_decimal(),
        };
        let response = check_status(self.http.post(url).json(&body).send().await?).await?;
        let text = response.text().await?;
        let envelope: OrderEnvelope = serde_json::from_str(&text)
            .map_err(|e| StorefrontError::Deserialization(e.to_string()))?;
        Ok(envelope.order.id)
    }
}
