use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::PriceBreakdown;
use super::product::{LensType, Product};

/// A stored cart line item.
///
/// Holds a weak reference to its product: `product_id` must be re-resolved
/// against the catalog store on every read. At most one line item exists per
/// distinct product; adding the same product again increments `quantity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: u32,
    pub product_id: u32,
    pub quantity: u32,
    #[serde(default)]
    pub lens_type: LensType,
    /// Opaque prescription payload captured by the lens selection form.
    /// The commerce core stores it verbatim and never interprets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<serde_json::Value>,
}

/// A cart line item joined with its catalog product at read time.
///
/// `unit_price` is the product's effective price at the moment of
/// resolution; the lens surcharge is not baked in and stays derivable from
/// `lens_type`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCartItem {
    pub id: u32,
    pub product: Product,
    pub quantity: u32,
    pub lens_type: LensType,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<serde_json::Value>,
}

impl ResolvedCartItem {
    /// Joins a stored line item with its resolved product.
    pub fn new(item: CartLineItem, product: Product) -> Self {
        let unit_price = product.effective_price();
        Self {
            id: item.id,
            product,
            quantity: item.quantity,
            lens_type: item.lens_type,
            unit_price,
            prescription: item.prescription,
        }
    }

    /// Line total: (effective price + lens surcharge) x quantity.
    pub fn line_total(&self) -> Decimal {
        (self.unit_price + self.lens_type.surcharge()) * Decimal::from(self.quantity)
    }
}

/// The cart as presented to callers: resolved items plus freshly computed
/// totals. Recomputed on every read, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<ResolvedCartItem>,
    pub totals: PriceBreakdown,
}

impl CartView {
    /// Sum of quantities across the resolved items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
