//! The cart store: single owner of the cart state.
//!
//! Every mutation goes through [`CartStore`], which persists the touched
//! record to the key-value store and notifies subscribers. Persistence is
//! best-effort; a storage failure is logged and the in-memory mutation
//! stands.

use crate::cart::item::{clamp_qty, StoredLineItem};
use crate::cart::{CartLineItem, OrderTotals, PricingRules, ProductSnapshot};
use crate::checkout::{PaymentMethod, ShippingAddress};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use serde::Serialize;
use shop_cache::{Cache, KeyValueStore};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Storage key for the line items.
pub const CART_ITEMS_KEY: &str = "cartItems";
/// Storage key for the shipping address.
pub const SHIPPING_ADDRESS_KEY: &str = "shippingAddress";
/// Storage key for the payment method.
pub const PAYMENT_METHOD_KEY: &str = "paymentMethod";

/// Everything the shopper has put together so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Line items in the order they were first added.
    pub items: Vec<CartLineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl CartState {
    /// Check if there are no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    pub fn item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Total units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.qty)).sum()
    }
}

/// Owns the cart state and keeps storage in step with it.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct CartStore {
    cache: Cache<Arc<dyn KeyValueStore>>,
    currency: Currency,
    state: RwLock<CartState>,
    changes: watch::Sender<CartState>,
}

impl CartStore {
    /// Create an empty store in the default currency. Nothing is read from
    /// storage until [`restore`](Self::restore).
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self::with_currency(store, Currency::default())
    }

    /// Create an empty store whose prices are in `currency`.
    pub fn with_currency<S: KeyValueStore + 'static>(store: S, currency: Currency) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let (changes, _) = watch::channel(CartState::default());
        Self {
            cache: Cache::new(store),
            currency,
            state: RwLock::new(CartState::default()),
            changes,
        }
    }

    /// Create a store and restore whatever was persisted.
    pub fn open<S: KeyValueStore + 'static>(store: S, currency: Currency) -> Self {
        let cart = Self::with_currency(store, currency);
        cart.restore();
        cart
    }

    /// Currency line item prices must be in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Reload the state from storage.
    ///
    /// Absent or malformed records fall back to an empty cart, an empty
    /// address and cash on delivery. Stored items are normalized: items
    /// without stock are dropped, quantities are clamped into range and a
    /// repeated product id replaces the earlier entry.
    pub fn restore(&self) {
        let items = self.restore_items();
        let shipping_address = self
            .read_record::<ShippingAddress>(SHIPPING_ADDRESS_KEY)
            .unwrap_or_default();
        let payment_method = self
            .read_record::<PaymentMethod>(PAYMENT_METHOD_KEY)
            .unwrap_or_default();

        let mut state = self.write();
        *state = CartState {
            items,
            shipping_address,
            payment_method,
        };
        debug!(items = state.items.len(), "cart restored");
        self.publish(&state);
    }

    /// Put a product in the cart, or update the line already holding it.
    ///
    /// The quantity is clamped into `[1, count_in_stock]`; the clamped value
    /// is returned. An existing line keeps its position and takes the new
    /// snapshot and quantity.
    pub fn add_or_update_item(
        &self,
        product: ProductSnapshot,
        requested_qty: i64,
    ) -> Result<u32, CommerceError> {
        if product.count_in_stock == 0 {
            return Err(CommerceError::OutOfStock(product.id));
        }
        if product.price.is_negative() {
            return Err(CommerceError::InvalidPrice(product.id));
        }
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        let qty = clamp_qty(requested_qty, product.count_in_stock);
        let item = CartLineItem::from_snapshot(product, qty);
        debug!(product_id = %item.product_id, requested_qty, qty, "cart item set");

        let mut state = self.write();
        match state
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => state.items.push(item),
        }
        self.persist(CART_ITEMS_KEY, &state.items);
        self.publish(&state);
        Ok(qty)
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove_item(&self, product_id: &ProductId) -> bool {
        let mut state = self.write();
        let before = state.items.len();
        state.items.retain(|i| &i.product_id != product_id);
        let removed = state.items.len() != before;
        debug!(%product_id, removed, "cart item removed");

        self.persist(CART_ITEMS_KEY, &state.items);
        self.publish(&state);
        removed
    }

    /// Replace the shipping address.
    pub fn set_shipping_address(&self, address: ShippingAddress) {
        let mut state = self.write();
        state.shipping_address = address;
        debug!(complete = state.shipping_address.is_complete(), "shipping address set");
        self.persist(SHIPPING_ADDRESS_KEY, &state.shipping_address);
        self.publish(&state);
    }

    /// Replace the payment method.
    pub fn set_payment_method(&self, method: PaymentMethod) {
        let mut state = self.write();
        state.payment_method = method;
        debug!(method = %state.payment_method, "payment method set");
        self.persist(PAYMENT_METHOD_KEY, &state.payment_method);
        self.publish(&state);
    }

    /// Reset to an empty cart and delete the persisted records.
    pub fn clear(&self) {
        let mut state = self.write();
        *state = CartState::default();
        for key in [CART_ITEMS_KEY, SHIPPING_ADDRESS_KEY, PAYMENT_METHOD_KEY] {
            if let Err(e) = self.cache.delete(key) {
                warn!(key, error = %e, "failed to delete persisted cart record");
            }
        }
        debug!("cart cleared");
        self.publish(&state);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CartState {
        self.read(CartState::clone)
    }

    /// Copy of the line items.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.read(|s| s.items.clone())
    }

    /// The line for a product, if any.
    pub fn item(&self, product_id: &ProductId) -> Option<CartLineItem> {
        self.read(|s| s.item(product_id).cloned())
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.read(CartState::item_count)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.read(|s| s.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.read(CartState::is_empty)
    }

    pub fn shipping_address(&self) -> ShippingAddress {
        self.read(|s| s.shipping_address.clone())
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.read(|s| s.payment_method.clone())
    }

    /// Derive totals for the current items.
    pub fn totals(&self, rules: &PricingRules) -> Result<OrderTotals, CommerceError> {
        self.read(|s| rules.calculate(&s.items))
    }

    /// Watch the state. The receiver sees the latest state after every
    /// mutation, restore and clear.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.changes.subscribe()
    }

    fn read<R>(&self, f: impl FnOnce(&CartState) -> R) -> R {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &CartState) {
        self.changes.send_replace(state.clone());
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value) {
            warn!(key, error = %e, "failed to persist cart record");
        }
    }

    fn read_record<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get::<T>(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cart record");
                None
            }
        }
    }

    fn restore_items(&self) -> Vec<CartLineItem> {
        let raw = self
            .read_record::<Vec<serde_json::Value>>(CART_ITEMS_KEY)
            .unwrap_or_default();

        let mut items: Vec<CartLineItem> = Vec::with_capacity(raw.len());
        for value in raw {
            let stored = match serde_json::from_value::<StoredLineItem>(value) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(error = %e, "dropping unreadable cart item");
                    continue;
                }
            };
            let Some(item) = stored.normalize(self.currency) else {
                continue;
            };
            match items.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        }
        items
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("currency", &self.currency)
            .field("items", &self.len())
            .finish_non_exhaustive()
    }
}
