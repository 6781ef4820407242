//! Cart item types.

use crate::cart::CategoryDiscounts;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An item held in the cart.
///
/// Identity is the server-issued `_id`; the human-readable name is
/// unique within a cart and doubles as the deletion key. Price fields
/// are captured when the item is created from a catalog product and
/// are never re-evaluated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Server-issued identifier.
    #[serde(rename = "_id")]
    pub id: ItemId,
    /// Product name, unique within the cart.
    pub name: String,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// Undiscounted unit price.
    #[serde(with = "crate::money::decimal")]
    pub original_price: Money,
    /// Unit price after the category discount captured at add time.
    #[serde(with = "crate::money::decimal")]
    pub discount_price: Money,
}

impl CartItem {
    /// Create a cart item, enforcing the domain invariants.
    ///
    /// Returns an error if:
    /// - quantity is less than 1
    /// - either price is negative
    /// - the discount price exceeds the original price
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        quantity: i64,
        original_price: Money,
        discount_price: Money,
    ) -> Result<Self, CommerceError> {
        validate_quantity(quantity)?;
        validate_prices(original_price, discount_price)?;

        Ok(Self {
            id,
            name: name.into(),
            image: String::new(),
            category: String::new(),
            description: String::new(),
            quantity,
            original_price,
            discount_price,
        })
    }

    /// Set the quantity, rejecting values below 1.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Total contribution of this item: discount price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.discount_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A cart item about to be sent to the cart service.
///
/// Same shape as [`CartItem`] minus the server-issued id; the service
/// assigns one when the item is created.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCartItem {
    /// Product name, unique within the cart.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Category label.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// Undiscounted unit price.
    #[serde(with = "crate::money::decimal")]
    pub original_price: Money,
    /// Unit price after the category discount captured right now.
    #[serde(with = "crate::money::decimal")]
    pub discount_price: Money,
}

impl NewCartItem {
    /// Build a new item from a catalog product, capturing the
    /// category's current discount rate. The discount is evaluated
    /// exactly once, here.
    pub fn from_product(
        product: &Product,
        discounts: &CategoryDiscounts,
    ) -> Result<Self, CommerceError> {
        let discount_price = discounts.discounted_price(product.price, &product.category)?;
        validate_prices(product.price, discount_price)?;

        Ok(Self {
            name: product.name.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            quantity: 1,
            original_price: product.price,
            discount_price,
        })
    }
}

fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn validate_prices(original: Money, discount: Money) -> Result<(), CommerceError> {
    if original.is_negative() {
        return Err(CommerceError::NegativePrice(original));
    }
    if discount.is_negative() {
        return Err(CommerceError::NegativePrice(discount));
    }
    if original.currency != discount.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: original.currency.code().to_string(),
            got: discount.currency.code().to_string(),
        });
    }
    if discount.amount_cents > original.amount_cents {
        return Err(CommerceError::DiscountExceedsPrice {
            discount,
            original,
        });
    }
    Ok(())
}
