//! Shopping cart module.
//!
//! Contains the cart store, line items and order total pricing.

mod item;
mod pricing;
mod store;

pub use item::{CartLineItem, ProductSnapshot};
pub use pricing::{OrderTotals, PricingRules};
pub use store::{CartState, CartStore, CART_ITEMS_KEY, PAYMENT_METHOD_KEY, SHIPPING_ADDRESS_KEY};
