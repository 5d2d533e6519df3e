//! Typed domain entities for the commerce core.
//!
//! Records crossing the store boundary are mapped into these strongly typed
//! shapes; nothing downstream of the stores ever sees a raw record.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{CartLineItem, CartView, ResolvedCartItem};
pub use order::{Address, ContactInfo, Order, OrderItem, OrderStatus, PriceBreakdown};
pub use product::{Category, FrameSize, Gender, LensType, Product};
