use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::entities::{CartLineItem, CartView, LensType, ResolvedCartItem};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::pricing::PricingService;
use crate::store::{CartItemPatch, CartStore, ProductStore};

fn default_quantity() -> u32 {
    1
}

/// Input for adding a product to the cart.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_id: u32,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub lens_type: LensType,
    /// Opaque prescription payload; stored verbatim on the line item.
    #[serde(default)]
    pub prescription: Option<serde_json::Value>,
}

impl AddToCartInput {
    /// One unit with standard lenses.
    pub fn product(product_id: u32) -> Self {
        Self {
            product_id,
            quantity: 1,
            lens_type: LensType::Standard,
            prescription: None,
        }
    }
}

/// Shopping cart service.
///
/// Owns the cart business rules: one line item per distinct product, quantity
/// semantics, and the best-effort resolution policy. Line items store only a
/// product id; every read re-resolves them against the catalog store and a
/// line whose product has vanished is dropped from the view (logged, never
/// surfaced as an error).
#[derive(Clone)]
pub struct CartService {
    products: Arc<dyn ProductStore>,
    cart: Arc<dyn CartStore>,
    pricing: Arc<PricingService>,
    event_sender: EventSender,
}

impl CartService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        cart: Arc<dyn CartStore>,
        pricing: Arc<PricingService>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            products,
            cart,
            pricing,
            event_sender,
        }
    }

    /// Adds a product to the cart, or increments the existing line item.
    ///
    /// Validates the input before any store call and requires the product to
    /// resolve in the catalog. When a line item for the product already
    /// exists its quantity grows by `input.quantity` and its lens type is
    /// left unchanged: the cart supports one lens variant per product, and
    /// the first selection wins. Otherwise a new line item is created with
    /// the next free identifier.
    ///
    /// Returns the refreshed cart view.
    #[instrument(skip(self, input), fields(product_id = input.product_id, quantity = input.quantity))]
    pub async fn add_item(&self, input: AddToCartInput) -> Result<CartView, ServiceError> {
        input.validate()?;

        let product = self
            .products
            .fetch_product_by_id(input.product_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let items = self.cart.fetch_cart_items().await?;
        match items.iter().find(|i| i.product_id == product.id) {
            Some(existing) => {
                let quantity = existing.quantity + input.quantity;
                self.cart
                    .update_cart_item(existing.id, CartItemPatch::quantity(quantity))
                    .await?;
                info!(product_id = product.id, quantity, "Incremented cart line item");
            }
            None => {
                let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
                self.cart
                    .create_cart_item(CartLineItem {
                        id,
                        product_id: product.id,
                        quantity: input.quantity,
                        lens_type: input.lens_type,
                        prescription: input.prescription,
                    })
                    .await?;
                info!(product_id = product.id, quantity = input.quantity, "Added cart line item");
            }
        }

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                product_id: product.id,
                quantity: input.quantity,
            })
            .await;

        self.get_cart().await
    }

    /// Sets a line item's quantity exactly (no delta).
    ///
    /// A quantity of zero or less is equivalent to [`remove_item`], and like
    /// removal, a product with no line item is a no-op that returns the
    /// current view.
    ///
    /// [`remove_item`]: CartService::remove_item
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: u32,
        quantity: i64,
    ) -> Result<CartView, ServiceError> {
        if quantity <= 0 {
            return self.remove_item(product_id).await;
        }
        let quantity = u32::try_from(quantity).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Quantity {} exceeds the supported maximum",
                quantity
            ))
        })?;

        let items = self.cart.fetch_cart_items().await?;
        let Some(item) = items.iter().find(|i| i.product_id == product_id) else {
            return self.get_cart().await;
        };

        self.cart
            .update_cart_item(item.id, CartItemPatch::quantity(quantity))
            .await?;

        self.event_sender
            .send_or_log(Event::CartItemUpdated {
                product_id,
                quantity,
            })
            .await;

        self.get_cart().await
    }

    /// Removes the line item for a product. Absent products are a no-op,
    /// not an error.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, product_id: u32) -> Result<CartView, ServiceError> {
        let items = self.cart.fetch_cart_items().await?;
        if let Some(item) = items.iter().find(|i| i.product_id == product_id) {
            self.cart.delete_cart_item(item.id).await?;
            self.event_sender
                .send_or_log(Event::CartItemRemoved { product_id })
                .await;
            info!(product_id, "Removed cart line item");
        }

        self.get_cart().await
    }

    /// Deletes every line item.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ServiceError> {
        let items = self.cart.fetch_cart_items().await?;
        for item in &items {
            self.cart.delete_cart_item(item.id).await?;
        }

        if !items.is_empty() {
            self.event_sender.send_or_log(Event::CartCleared).await;
            info!(removed = items.len(), "Cleared cart");
        }
        Ok(())
    }

    /// Resolves the cart against the catalog and returns it with fresh
    /// totals.
    ///
    /// Collection reads degrade: a cart-store outage yields an empty view
    /// rather than an error. Per-item product lookups that fail (missing or
    /// unreachable) drop the line from the view, keeping the rest of the
    /// cart usable.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<CartView, ServiceError> {
        let items = self.fetch_items_degraded().await;

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            match self.products.fetch_product_by_id(item.product_id).await {
                Ok(Some(product)) => resolved.push(ResolvedCartItem::new(item, product)),
                Ok(None) => {
                    warn!(
                        product_id = item.product_id,
                        line_item_id = item.id,
                        "Dropping cart line item: product no longer in catalog"
                    );
                }
                Err(e) => {
                    warn!(
                        product_id = item.product_id,
                        line_item_id = item.id,
                        error = %e,
                        "Dropping cart line item: product lookup failed"
                    );
                }
            }
        }

        let totals = self.pricing.price_items(&resolved);
        Ok(CartView {
            items: resolved,
            totals,
        })
    }

    /// Sum of quantities across the stored line items. Works on the raw
    /// records; no catalog resolution needed for a badge count.
    #[instrument(skip(self))]
    pub async fn item_count(&self) -> u32 {
        self.fetch_items_degraded()
            .await
            .iter()
            .map(|i| i.quantity)
            .sum()
    }

    async fn fetch_items_degraded(&self) -> Vec<CartLineItem> {
        match self.cart.fetch_cart_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Cart store unavailable; treating cart as empty");
                Vec::new()
            }
        }
    }
}
