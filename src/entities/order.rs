use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::{LensType, Product};

/// Monetary totals for a cart or order, rounded to two fraction digits.
///
/// Derived on every cart read and frozen into an order at checkout; never
/// persisted on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// All-zero breakdown, the price of an empty cart.
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Shipping address captured by the checkout form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Street address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "ZIP code is required"))]
    pub zip_code: String,
    /// Left blank by the form for domestic orders; the order service fills
    /// in the configured default country before persisting.
    #[serde(default)]
    pub country: String,
}

/// Contact details captured by the checkout form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
}

/// Order lifecycle status. New orders always start as `Processing`; the
/// commerce core records but never transitions statuses (fulfillment lives
/// outside this crate).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// One line of an order: the product and its effective unit price frozen at
/// the time of purchase, so later catalog changes never alter history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: u32,
    pub product: Product,
    pub quantity: u32,
    pub lens_type: LensType,
    pub unit_price: Decimal,
}

/// An immutable order snapshot produced by the order service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u32,
    pub items: Vec<OrderItem>,
    pub totals: PriceBreakdown,
    pub shipping_address: Address,
    pub contact_info: ContactInfo,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
