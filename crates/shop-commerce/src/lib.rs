//! Cart and checkout engine for the storefront.
//!
//! - **Cart**: the [`CartStore`](cart::CartStore) owns line items, shipping
//!   address and payment method, persisting each mutation to a key-value
//!   store
//! - **Pricing**: items, shipping, tax and total derived from the cart
//! - **Checkout**: guarded `cart -> shipping -> payment -> review` flow that
//!   hands the order to an [`OrderSubmitter`](checkout::OrderSubmitter)
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_commerce::prelude::*;
//! use std::sync::Arc;
//!
//! let cart = Arc::new(CartStore::open(FileStore::open(".shop")?, Currency::BDT));
//! cart.add_or_update_item(product, 2)?;
//!
//! let checkout = CheckoutController::new(cart.clone(), sessions, orders);
//! match checkout.proceed_to_shipping().await {
//!     Transition::Login { .. } => println!("sign in first"),
//!     t => println!("go to {}", t.location()),
//! }
//!
//! let totals = cart.totals(checkout.rules())?;
//! println!("Total: {}", totals.total_price.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        CartLineItem, CartState, CartStore, OrderTotals, PricingRules, ProductSnapshot,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutController, CheckoutStep, OrderItem, OrderSubmission, OrderSubmitter,
        PaymentMethod, PlaceOrderOutcome, PlacedOrder, ShippingAddress, SubmitError, Transition,
    };
}
