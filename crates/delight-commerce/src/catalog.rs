//! Catalog product types.
//!
//! Only the shape the cart needs: the storefront adds items to the
//! cart from catalog products, capturing the category discount at
//! that moment.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A catalog product as served by the remote catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name (unique within the catalog; the cart reuses it as
    /// a secondary deletion key).
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Undiscounted unit price.
    #[serde(with = "crate::money::decimal")]
    pub price: Money,
    /// Category label (e.g., "Main Course").
    pub category: String,
    /// Optional star rating, display only.
    #[serde(default)]
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_product_wire_shape() {
        let json = r#"{
            "id": "12",
            "name": "Paneer Tikka",
            "description": "Chargrilled paneer",
            "image": "paneer.jpg",
            "price": 100.0,
            "category": "Appetizer",
            "rating": 4.5
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Paneer Tikka");
        assert_eq!(product.price, Money::new(10000, Currency::INR));
    }
}
