//! Session lookup for the storefront checkout.
//!
//! Provides the user and session types reported by the backend and the
//! [`SessionLookup`] seam the checkout guards consult before letting a
//! shopper past the cart.

mod error;
mod lookup;
mod session;
mod user;

pub use error::AuthError;
pub use lookup::{MemorySessions, SessionLookup};
pub use session::{AuthToken, Session};
pub use user::{Role, User, UserId};
