//! Commerce domain types and logic for the FoodDelights storefront.
//!
//! This crate holds the pure domain layer shared by the storefront
//! runtime:
//!
//! - **Money**: paise-based monetary values with checked arithmetic
//! - **Cart**: cart items, derived totals, category discounts
//! - **Catalog**: the minimal product shape items are created from
//!
//! # Example
//!
//! ```rust
//! use delight_commerce::prelude::*;
//!
//! let mut discounts = CategoryDiscounts::new();
//! discounts.set("Appetizer", 10.0);
//!
//! let product = Product {
//!     id: ProductId::new("12"),
//!     name: "Paneer Tikka".to_string(),
//!     description: String::new(),
//!     image: String::new(),
//!     price: Money::from_decimal(100.0, Currency::INR),
//!     category: "Appetizer".to_string(),
//!     rating: None,
//! };
//!
//! let item = NewCartItem::from_product(&product, &discounts).unwrap();
//! assert_eq!(item.discount_price, Money::from_decimal(90.0, Currency::INR));
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartItem, CartTotals, CategoryDiscounts, NewCartItem};
    pub use crate::catalog::Product;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
}
