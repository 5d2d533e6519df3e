//! Record-store boundary.
//!
//! The commerce core owns no persistence. It consumes three narrow async
//! traits and callers inject whatever backs them (the bundled
//! [`InMemoryStore`] for tests and embedding, a remote table API in the
//! storefront deployment). Every method can fail with
//! [`StoreError::Unavailable`](crate::errors::StoreError); services decide
//! whether a failure degrades a read or aborts a write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Address, CartLineItem, ContactInfo, LensType, Order, OrderItem, OrderStatus, PriceBreakdown,
    Product,
};
use crate::errors::StoreError;

mod memory;

pub use memory::InMemoryStore;

/// Partial update applied to a stored cart line item. Unset fields are left
/// untouched.
#[derive(Clone, Debug, Default)]
pub struct CartItemPatch {
    pub quantity: Option<u32>,
    pub lens_type: Option<LensType>,
}

impl CartItemPatch {
    /// Patch that only changes the quantity.
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }
}

/// An order as handed to the order store, before an identifier is assigned.
/// The store allocates the next id (max existing + 1) at insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub totals: PriceBreakdown,
    pub shipping_address: Address,
    pub contact_info: ContactInfo,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Read-only access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, in catalog (insertion) order.
    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Single product lookup; `None` when the id does not resolve.
    async fn fetch_product_by_id(&self, id: u32) -> Result<Option<Product>, StoreError>;
}

/// CRUD access to the stored cart line items of the current session.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// All line items, in insertion order.
    async fn fetch_cart_items(&self) -> Result<Vec<CartLineItem>, StoreError>;

    /// Inserts a line item exactly as given (the cart service allocates ids).
    async fn create_cart_item(&self, item: CartLineItem) -> Result<CartLineItem, StoreError>;

    /// Applies a patch to the line item with the given id. Returns the
    /// updated record, or `None` if no such item exists.
    async fn update_cart_item(
        &self,
        id: u32,
        patch: CartItemPatch,
    ) -> Result<Option<CartLineItem>, StoreError>;

    /// Deletes the line item with the given id; absent ids are a no-op.
    async fn delete_cart_item(&self, id: u32) -> Result<(), StoreError>;
}

/// Append-and-read access to persisted orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order, assigning the next free identifier.
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Single order lookup; `None` when the id does not resolve.
    async fn fetch_order_by_id(&self, id: u32) -> Result<Option<Order>, StoreError>;

    /// All orders, in insertion order.
    async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError>;
}
