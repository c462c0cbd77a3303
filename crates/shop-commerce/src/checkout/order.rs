//! Order submission types and the order-service seam.

use crate::cart::{CartLineItem, CartState, OrderTotals, PricingRules};
use crate::checkout::{PaymentMethod, ShippingAddress};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::{self, Money};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// One line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    #[serde(rename = "product")]
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub qty: u32,
}

impl From<&CartLineItem> for OrderItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            qty: item.qty,
        }
    }
}

/// Immutable snapshot of the cart handed to the order service.
///
/// Serializes to the body `POST /api/orders` expects, with every amount as
/// a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(with = "money::decimal")]
    pub items_price: Money,
    #[serde(with = "money::decimal")]
    pub shipping_price: Money,
    #[serde(with = "money::decimal")]
    pub tax_price: Money,
    #[serde(with = "money::decimal")]
    pub total_price: Money,
}

impl OrderSubmission {
    /// Snapshot the cart with totals computed now.
    pub fn from_cart(state: &CartState, rules: &PricingRules) -> Result<Self, CommerceError> {
        let totals = rules.calculate(&state.items)?;
        Ok(Self {
            order_items: state.items.iter().map(OrderItem::from).collect(),
            shipping_address: state.shipping_address.clone(),
            payment_method: state.payment_method.clone(),
            items_price: totals.items_price,
            shipping_price: totals.shipping_price,
            tax_price: totals.tax_price,
            total_price: totals.total_price,
        })
    }

    /// The totals this order was submitted with.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
        }
    }
}

/// What the order service returns for a created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    #[serde(rename = "_id")]
    pub id: OrderId,
}

/// Rejection from the order service, with a message meant for the shopper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Creates orders.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit an order; the error message is shown to the shopper as is.
    async fn submit_order(&self, order: &OrderSubmission) -> Result<PlacedOrder, SubmitError>;
}

#[async_trait]
impl<T: OrderSubmitter + ?Sized> OrderSubmitter for Arc<T> {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<PlacedOrder, SubmitError> {
        (**self).submit_order(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn state() -> CartState {
        CartState {
            items: vec![CartLineItem {
                product_id: ProductId::new("p1"),
                name: "Cannon EOS 80D".into(),
                image: "/images/camera.jpg".into(),
                price: Money::new(8000, Currency::BDT),
                count_in_stock: 5,
                qty: 2,
            }],
            shipping_address: ShippingAddress::new("Road 1", "Dhaka", "1207", "Bangladesh"),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn test_submission_wire_shape() {
        let order = OrderSubmission::from_cart(&state(), &PricingRules::default()).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orderItems": [{
                    "product": "p1",
                    "name": "Cannon EOS 80D",
                    "image": "/images/camera.jpg",
                    "price": 80.0,
                    "qty": 2
                }],
                "shippingAddress": {
                    "address": "Road 1",
                    "city": "Dhaka",
                    "postalCode": "1207",
                    "country": "Bangladesh"
                },
                "paymentMethod": "COD",
                "itemsPrice": 160.0,
                "shippingPrice": 0.0,
                "taxPrice": 24.0,
                "totalPrice": 184.0
            })
        );
    }

    #[test]
    fn test_submission_keeps_totals() {
        let order = OrderSubmission::from_cart(&state(), &PricingRules::default()).unwrap();
        assert_eq!(order.totals().total_price, Money::new(18_400, Currency::BDT));
    }

    #[test]
    fn test_placed_order_from_backend_json() {
        let placed: PlacedOrder =
            serde_json::from_str(r#"{"_id":"ord-9","isPaid":false,"totalPrice":184}"#).unwrap();
        assert_eq!(placed.id.as_str(), "ord-9");
    }
}
