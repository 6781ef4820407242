//! Category-level discount rates.

use crate::error::CommerceError;
use crate::money::Money;
use std::collections::HashMap;

/// Percentage discount rates keyed by category label.
///
/// The storefront fetches these alongside the catalog; they apply at
/// the moment a product is added to the cart and are never reapplied
/// to items already in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDiscounts {
    rates: HashMap<String, f64>,
}

impl CategoryDiscounts {
    /// Create an empty discount table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discount rate (in percent) for a category.
    pub fn set(&mut self, category: impl Into<String>, percent: f64) {
        self.rates.insert(category.into(), percent);
    }

    /// Get the discount rate for a category, if any.
    pub fn rate(&self, category: &str) -> Option<f64> {
        self.rates.get(category).copied()
    }

    /// Compute the discounted unit price for a category.
    ///
    /// A category without a configured rate keeps the original price.
    pub fn discounted_price(
        &self,
        original: Money,
        category: &str,
    ) -> Result<Money, CommerceError> {
        let Some(percent) = self.rate(category) else {
            return Ok(original);
        };

        let reduction = original.percentage(percent);
        original
            .try_subtract(&reduction)
            .ok_or(CommerceError::Overflow)
    }
}

impl FromIterator<(String, f64)> for CategoryDiscounts {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}
