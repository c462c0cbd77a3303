//! Checkout module.
//!
//! Contains the checkout flow controller, shipping address, payment method
//! and order submission types.

mod address;
mod flow;
mod order;
mod payment;

pub use address::ShippingAddress;
pub use flow::{CheckoutController, CheckoutStep, PlaceOrderOutcome, Transition};
pub use order::{OrderItem, OrderSubmission, OrderSubmitter, PlacedOrder, SubmitError};
pub use payment::PaymentMethod;
