//! Business services of the commerce core.
//!
//! Each service owns one concern and reaches persistence only through the
//! store traits in [`crate::store`]. [`AppServices`] wires them together
//! with explicit dependency injection; there is no ambient global state.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod pricing;

pub use cart::{AddToCartInput, CartService};
pub use catalog::{CatalogService, FilterOptions, PriceRange, ProductQuery, SortKey};
pub use orders::{CreateOrderInput, OrderService};
pub use pricing::PricingService;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::store::{CartStore, OrderStore, ProductStore};

/// Container for the fully wired service stack.
///
/// Constructed once at application start from a config, the injected store
/// implementations, and the event channel; cloned freely by consumers
/// (every service is internally `Arc`-shared).
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub pricing: Arc<PricingService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(
        config: Arc<AppConfig>,
        products: Arc<dyn ProductStore>,
        cart_store: Arc<dyn CartStore>,
        order_store: Arc<dyn OrderStore>,
        event_sender: EventSender,
    ) -> Self {
        let pricing = Arc::new(PricingService::new(config.clone()));
        let catalog = Arc::new(CatalogService::new(products.clone()));
        let cart = Arc::new(CartService::new(
            products,
            cart_store,
            pricing.clone(),
            event_sender.clone(),
        ));
        let orders = Arc::new(OrderService::new(
            order_store,
            cart.clone(),
            config,
            event_sender,
        ));

        Self {
            catalog,
            cart,
            pricing,
            orders,
        }
    }
}
