//! REST client for the storefront backend.
//!
//! [`ApiClient`] covers the calls the cart and checkout need: login, the
//! current user, product lookup and order creation. It implements
//! [`SessionLookup`](shop_auth::SessionLookup) and
//! [`OrderSubmitter`](shop_commerce::checkout::OrderSubmitter), so it can be
//! handed straight to a
//! [`CheckoutController`](shop_commerce::checkout::CheckoutController).

mod checkout;
mod client;
mod error;

pub use client::{ApiClient, ApiConfig};
pub use error::ApiError;
