//! VisionHub Commerce Core
//!
//! Service layer for the VisionHub eyewear storefront: catalog queries
//! (filter, sort, search, facets), cart management, pricing, and order
//! creation. Persistence stays outside the crate behind the store traits in
//! [`store`]; callers inject implementations and the bundled
//! [`store::InMemoryStore`] covers tests and in-process embedding.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod store;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::events::{Event, EventSender};
use crate::store::{CartStore, InMemoryStore, OrderStore, ProductStore};

/// Application state: configuration, event channel handle, and the wired
/// service stack. Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub event_sender: EventSender,
    pub services: services::AppServices,
}

impl AppState {
    /// Wires the full service stack over the given store implementations.
    ///
    /// Returns the state together with the receiving end of the event
    /// channel; callers typically hand the receiver to
    /// [`events::process_events`] on a background task.
    pub fn new(
        config: config::AppConfig,
        products: Arc<dyn ProductStore>,
        cart_store: Arc<dyn CartStore>,
        order_store: Arc<dyn OrderStore>,
    ) -> (Self, mpsc::Receiver<Event>) {
        let config = Arc::new(config);
        let (event_sender, receiver) = EventSender::channel(config.event_channel_capacity);
        let services = services::AppServices::new(
            config.clone(),
            products,
            cart_store,
            order_store,
            event_sender.clone(),
        );

        (
            Self {
                config,
                event_sender,
                services,
            },
            receiver,
        )
    }

    /// Convenience wiring over a single shared [`InMemoryStore`], the usual
    /// setup for tests and demos.
    pub fn in_memory(
        config: config::AppConfig,
        store: Arc<InMemoryStore>,
    ) -> (Self, mpsc::Receiver<Event>) {
        Self::new(config, store.clone(), store.clone(), store)
    }
}

/// Commonly used types, re-exported for embedders.
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::entities::{
        Address, CartLineItem, CartView, Category, ContactInfo, FrameSize, Gender, LensType,
        Order, OrderItem, OrderStatus, PriceBreakdown, Product, ResolvedCartItem,
    };
    pub use crate::errors::{ServiceError, StoreError};
    pub use crate::events::{Event, EventSender};
    pub use crate::services::{
        AddToCartInput, AppServices, CatalogService, CartService, CreateOrderInput, FilterOptions,
        OrderService, PriceRange, PricingService, ProductQuery, SortKey,
    };
    pub use crate::store::{CartStore, InMemoryStore, OrderStore, ProductStore};
    pub use crate::AppState;
}
