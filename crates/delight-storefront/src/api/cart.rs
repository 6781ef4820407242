//! Cart service client.
//!
//! A thin request layer over the remote cart service. It keeps no
//! state and does not retry; recovery policy belongs to the caller.

use async_trait::async_trait;
use delight_commerce::cart::{CartItem, NewCartItem};
use delight_commerce::ids::ItemId;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::StorefrontError;

/// Envelope the cart service wraps the item list in.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSnapshot {
    /// The items currently in the remote cart.
    #[serde(rename = "Cart_Items")]
    pub cart_items: Vec<CartItem>,
}

/// Response to a successful add.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemResponse {
    /// Human-readable confirmation from the service.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct UpdateQuantityBody<'a> {
    #[serde(rename = "_id")]
    id: &'a ItemId,
    quantity: i64,
}

/// Asynchronous operations against the remote cart service.
#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the full remote cart.
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, StorefrontError>;

    /// Create an item in the remote cart. The service answers 400
    /// when an item with the same name already exists.
    async fn add_item(&self, item: &NewCartItem) -> Result<AddItemResponse, StorefrontError>;

    /// Delete an item by name (the secondary deletion key).
    async fn delete_item(&self, name: &str) -> Result<(), StorefrontError>;

    /// Set the quantity of an item by server id.
    async fn update_quantity(&self, id: &ItemId, quantity: i64) -> Result<(), StorefrontError>;

    /// Remove every item from the remote cart.
    async fn clear_cart(&self) -> Result<(), StorefrontError>;
}

/// [`CartApi`] implementation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCartClient {
    http: Client,
    base: Url,
}

impl HttpCartClient {
    /// Build a client from the storefront configuration.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StorefrontError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let base = parse_base(&config.cart_service_url)?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        join_segments(&self.base, segments)
    }
}

#[async_trait]
impl CartApi for HttpCartClient {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, StorefrontError> {
        let url = self.endpoint(&["cart", "get_cart_items"]);
        let response = check_status(self.http.get(url).send().await?).await?;
        let body = response.text().await?;
        let snapshot: CartSnapshot = serde_json::from_str(&body)
            .map_err(|e| StorefrontError::Deserialization(e.to_string()))?;
        Ok(snapshot.cart_items)
    }

    async fn add_item(&self, item: &NewCartItem) -> Result<AddItemResponse, StorefrontError> {
        let url = self.endpoint(&["cart", "add_item"]);
        let response = check_status(self.http.post(url).json(item).send().await?).await?;
        let body = response.text().await?;
        // The confirmation message is advisory; tolerate other shapes.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn delete_item(&self, name: &str) -> Result<(), StorefrontError> {
        // Names can contain spaces; Url percent-encodes the segment.
        let url = self.endpoint(&["cart", "delete_cart_item", name]);
        check_status(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn update_quantity(&self, id: &ItemId, quantity: i64) -> Result<(), StorefrontError> {
        let url = self.endpoint(&["cart", "update_cart_quantity"]);
        let body = UpdateQuantityBody { id, quantity };
        check_status(self.http.patch(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), StorefrontError> {
        let url = self.endpoint(&["cart", "clear_cart"]);
        check_status(self.http.delete(url).send().await?).await?;
        Ok(())
    }
}

/// Parse a base URL, rejecting ones that cannot carry path segments.
pub(crate) fn parse_base(raw: &str) -> Result<Url, StorefrontError> {
    let base = Url::parse(raw)?;
    if base.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithoutBase.into());
    }
    Ok(base)
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Turn non-2xx responses into [`StorefrontError::Http`], keeping the
/// status and body for the caller to inspect.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, StorefrontError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(StorefrontError::Http {
        status: status.as_u16(),
        url,
        body,
    })
}
