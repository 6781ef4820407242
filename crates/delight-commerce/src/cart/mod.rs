//! Shopping cart module.
//!
//! Contains types for cart items, derived totals, and category
//! discounts.

mod discount;
mod item;
mod totals;

pub use discount::CategoryDiscounts;
pub use item::{CartItem, NewCartItem};
pub use totals::CartTotals;
