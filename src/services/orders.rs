use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::config::AppConfig;
use crate::entities::{Address, ContactInfo, Order, OrderItem, OrderStatus};
use crate::errors::{ServiceError, StoreError};
use crate::events::{Event, EventSender};
use crate::services::cart::CartService;
use crate::store::{NewOrder, OrderStore};

/// Checkout form data: where to ship and how to reach the buyer.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[validate]
    pub shipping_address: Address,
    #[validate]
    pub contact_info: ContactInfo,
}

/// Builds immutable orders out of the current cart.
///
/// `create_order` is the only write path: it snapshots the resolved cart
/// (products and effective prices frozen at purchase time), persists the
/// snapshot, and clears the cart strictly after persistence succeeds.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    cart: Arc<CartService>,
    config: Arc<AppConfig>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        cart: Arc<CartService>,
        config: Arc<AppConfig>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            orders,
            cart,
            config,
            event_sender,
        }
    }

    /// Creates an order from the current cart.
    ///
    /// Order of operations matters and is part of the contract:
    /// 1. Validate the checkout form (before any store call).
    /// 2. Resolve the cart; an empty resolved cart fails with `EmptyCart`
    ///    before the order store is touched.
    /// 3. Persist the snapshot (totals, line items with frozen prices,
    ///    status `Processing`, creation timestamp).
    /// 4. Only after persistence succeeds, clear the cart. A failed clear
    ///    does not fail the checkout: the order is already durable, so the
    ///    failure is logged and the stale cart is left for the next read.
    ///
    /// If persistence itself fails, the cart is left untouched.
    #[instrument(skip(self, input), fields(email = %input.contact_info.email))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<Order, ServiceError> {
        input.validate()?;

        let cart = self.cart.get_cart().await?;
        if cart.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let mut shipping_address = input.shipping_address;
        if shipping_address.country.trim().is_empty() {
            shipping_address.country = self.config.default_country.clone();
        }

        let items = cart
            .items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product.id,
                product: item.product.clone(),
                quantity: item.quantity,
                lens_type: item.lens_type,
                unit_price: item.unit_price,
            })
            .collect();

        let order = self
            .orders
            .create_order(NewOrder {
                items,
                totals: cart.totals,
                shipping_address,
                contact_info: input.contact_info,
                status: OrderStatus::Processing,
                created_at: Utc::now(),
            })
            .await?;

        if let Err(e) = self.cart.clear().await {
            warn!(order_id = order.id, error = %e, "Order persisted but cart clear failed");
        }

        self.event_sender
            .send_or_log(Event::OrderCreated(order.id))
            .await;

        info!(order_id = order.id, total = %order.totals.total, "Created order");
        Ok(order)
    }

    /// Looks up a single order.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: u32) -> Result<Order, ServiceError> {
        self.orders
            .fetch_order_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    /// All orders, newest first. Degrades to an empty list when the order
    /// store is unreachable.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Vec<Order> {
        let mut orders = match self.orders.fetch_orders().await {
            Ok(orders) => orders,
            Err(StoreError::Unavailable(msg)) => {
                warn!(error = %msg, "Order store unavailable; returning empty order list");
                Vec::new()
            }
        };
        orders.sort_by_key(|o| std::cmp::Reverse(o.id));
        orders
    }
}
