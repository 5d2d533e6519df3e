use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entities::{CartLineItem, Order, Product};
use crate::errors::StoreError;

use super::{CartItemPatch, CartStore, NewOrder, OrderStore, ProductStore};

/// In-memory implementation of all three store traits.
///
/// Backs tests and in-process embedding. Tables live behind
/// `tokio::sync::RwLock` so a single instance can be shared behind `Arc`;
/// the lock imposes no ordering beyond that. `set_offline(true)` makes every
/// subsequent call fail with [`StoreError::Unavailable`], which is how the
/// test suites exercise outage handling.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<Vec<Product>>,
    cart_items: RwLock<Vec<CartLineItem>>,
    orders: RwLock<Vec<Order>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-loaded with the given catalog.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            ..Self::default()
        }
    }

    /// Replaces the product catalog.
    pub async fn seed_products(&self, products: Vec<Product>) {
        *self.products.write().await = products;
    }

    /// Removes a single product, simulating a catalog delisting.
    pub async fn remove_product(&self, id: u32) {
        self.products.write().await.retain(|p| p.id != id);
    }

    /// Toggles outage simulation: while offline, every operation fails with
    /// `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        self.ensure_online()?;
        Ok(self.products.read().await.clone())
    }

    async fn fetch_product_by_id(&self, id: u32) -> Result<Option<Product>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn fetch_cart_items(&self) -> Result<Vec<CartLineItem>, StoreError> {
        self.ensure_online()?;
        Ok(self.cart_items.read().await.clone())
    }

    async fn create_cart_item(&self, item: CartLineItem) -> Result<CartLineItem, StoreError> {
        self.ensure_online()?;
        self.cart_items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update_cart_item(
        &self,
        id: u32,
        patch: CartItemPatch,
    ) -> Result<Option<CartLineItem>, StoreError> {
        self.ensure_online()?;
        let mut items = self.cart_items.write().await;
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(lens_type) = patch.lens_type {
            item.lens_type = lens_type;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_cart_item(&self, id: u32) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.cart_items.write().await.retain(|i| i.id != id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.ensure_online()?;
        let mut orders = self.orders.write().await;
        let id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let order = Order {
            id,
            items: order.items,
            totals: order.totals,
            shipping_address: order.shipping_address,
            contact_info: order.contact_info,
            status: order.status,
            created_at: order.created_at,
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn fetch_order_by_id(&self, id: u32) -> Result<Option<Order>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.ensure_online()?;
        Ok(self.orders.read().await.clone())
    }
}
