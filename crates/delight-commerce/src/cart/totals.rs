//! Derived cart quantities.

use crate::cart::CartItem;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Totals derived from the current cart contents.
///
/// Always recomputed from the item list, never cached; a stale total
/// would silently disagree with the rendered items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    /// Sum of quantities over all items.
    pub item_count: i64,
    /// Sum of discount price times quantity over all items.
    pub total_price: Money,
}

impl CartTotals {
    /// Compute totals over a slice of cart items.
    pub fn compute(items: &[CartItem]) -> Result<Self, CommerceError> {
        let item_count = items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.quantity))
            .ok_or(CommerceError::Overflow)?;

        let currency = items
            .first()
            .map(|i| i.discount_price.currency)
            .unwrap_or(Currency::default());

        let total_price = items
            .iter()
            .try_fold(Money::zero(currency), |acc, item| {
                acc.try_add(&item.line_total()?).ok_or(CommerceError::Overflow)
            })?;

        Ok(Self {
            item_count,
            total_price,
        })
    }

    /// An empty cart's totals.
    pub fn empty() -> Self {
        Self {
            item_count: 0,
            total_price: Money::zero(Currency::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;

    fn item(id: &str, quantity: i64, discount_cents: i64) -> CartItem {
        CartItem::new(
            ItemId::new(id),
            format!("item-{id}"),
            quantity,
            Money::new(discount_cents, Currency::INR),
            Money::new(discount_cents, Currency::INR),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_totals() {
        let totals = CartTotals::compute(&[]).unwrap();
        assert_eq!(totals.item_count, 0);
        assert!(totals.total_price.is_zero());
    }

    #[test]
    fn test_totals_sum_quantities_and_prices() {
        let items = vec![item("a", 2, 9000), item("b", 3, 5000)];
        let totals = CartTotals::compute(&items).unwrap();

        assert_eq!(totals.item_count, 5);
        // 2 x ₹90.00 + 3 x ₹50.00 = ₹330.00
        assert_eq!(totals.total_price, Money::new(33000, Currency::INR));
    }
}
