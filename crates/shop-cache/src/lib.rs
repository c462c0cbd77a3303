//! Durable key-value storage for the storefront cart.
//!
//! The cart persists itself after every mutation into a string-keyed store,
//! the way the web storefront used browser storage. This crate provides the
//! seam ([`KeyValueStore`]), two implementations and a typed JSON wrapper.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".shop")?);
//!
//! // Store a value
//! cache.set("paymentMethod", "COD")?;
//!
//! // Retrieve a value
//! let method: Option<String> = cache.get("paymentMethod")?;
//!
//! // Delete a value
//! cache.delete("paymentMethod")?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use store::{validate_key, KeyValueStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
