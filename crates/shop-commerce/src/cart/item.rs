//! Cart line items.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Currency, Money};
use serde::{Deserialize, Serialize};

/// What the catalog knows about a product at the moment it is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image reference (URL or path).
    pub image: String,
    /// Unit price.
    pub price: Money,
    /// Units available.
    pub count_in_stock: u32,
}

/// One product in the cart with the quantity the shopper asked for.
///
/// Serializes to the shape the storefront persists:
/// `{"_id","name","image","price","countInStock","qty"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineItem {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    #[serde(rename = "countInStock")]
    pub count_in_stock: u32,
    /// Always within `1..=count_in_stock`.
    pub qty: u32,
}

impl CartLineItem {
    /// Build a line item from a snapshot with an already-clamped quantity.
    pub(crate) fn from_snapshot(product: ProductSnapshot, qty: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            image: product.image,
            price: product.price,
            count_in_stock: product.count_in_stock,
            qty,
        }
    }

    /// `price * qty`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.price.try_multiply(i64::from(self.qty))
    }

    /// Whether the quantity can still be raised.
    pub fn can_increase(&self) -> bool {
        self.qty < self.count_in_stock
    }
}

/// Clamp a requested quantity into `[1, stock]`.
///
/// `stock` must be positive.
pub(crate) fn clamp_qty(requested: i64, stock: u32) -> u32 {
    let clamped = requested.clamp(1, i64::from(stock));
    u32::try_from(clamped).unwrap_or(stock)
}

/// A line item as read back from storage.
///
/// Numbers are read loosely so out-of-range values can be normalized instead
/// of failing the whole restore.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoredLineItem {
    #[serde(rename = "_id")]
    product_id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    price: f64,
    #[serde(rename = "countInStock", default)]
    count_in_stock: i64,
    #[serde(default)]
    qty: i64,
}

impl StoredLineItem {
    /// Convert to a line item that satisfies the quantity invariant.
    ///
    /// Returns `None` for items with no stock or an unusable price.
    pub(crate) fn normalize(self, currency: Currency) -> Option<CartLineItem> {
        if self.count_in_stock <= 0 || !self.price.is_finite() || self.price < 0.0 {
            return None;
        }
        let stock = u32::try_from(self.count_in_stock).unwrap_or(u32::MAX);
        Some(CartLineItem {
            qty: clamp_qty(self.qty, stock),
            product_id: self.product_id,
            name: self.name,
            image: self.image,
            price: Money::from_decimal(self.price, currency),
            count_in_stock: stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_qty() {
        assert_eq!(clamp_qty(0, 5), 1);
        assert_eq!(clamp_qty(-3, 5), 1);
        assert_eq!(clamp_qty(3, 5), 3);
        assert_eq!(clamp_qty(99, 5), 5);
        assert_eq!(clamp_qty(i64::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_line_item_persisted_shape() {
        let item = CartLineItem {
            product_id: ProductId::new("p1"),
            name: "Airpods".into(),
            image: "/images/airpods.jpg".into(),
            price: Money::new(8999, Currency::BDT),
            count_in_stock: 10,
            qty: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "p1",
                "name": "Airpods",
                "image": "/images/airpods.jpg",
                "price": 89.99,
                "countInStock": 10,
                "qty": 2
            })
        );
        assert_eq!(item.line_total().unwrap(), Money::new(17998, Currency::BDT));
    }

    #[test]
    fn test_stored_item_is_normalized() {
        let stored: StoredLineItem = serde_json::from_str(
            r#"{"_id":"p1","name":"Phone","price":599.99,"countInStock":3,"qty":7}"#,
        )
        .unwrap();
        let item = stored.normalize(Currency::BDT).unwrap();
        assert_eq!(item.qty, 3);
        assert_eq!(item.price.minor_units(), 59999);
        assert!(!item.can_increase());
    }

    #[test]
    fn test_stored_item_without_stock_is_dropped() {
        let stored: StoredLineItem =
            serde_json::from_str(r#"{"_id":"p1","price":10,"countInStock":0,"qty":1}"#).unwrap();
        assert!(stored.normalize(Currency::BDT).is_none());

        let negative: StoredLineItem =
            serde_json::from_str(r#"{"_id":"p2","price":-1,"countInStock":4,"qty":1}"#).unwrap();
        assert!(negative.normalize(Currency::BDT).is_none());
    }
}
