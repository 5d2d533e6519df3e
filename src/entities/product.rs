use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Product category
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Eyeglasses,
    Sunglasses,
}

/// Target gender for a frame. Unisex products match every gender filter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    Men,
    Women,
    Unisex,
}

/// Lens variant selected for a cart line item.
///
/// Each variant carries a flat additive surcharge applied per unit on top of
/// the product's effective price.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LensType {
    #[default]
    Standard,
    BlueLight,
    Prescription,
}

impl LensType {
    /// Flat per-unit surcharge for this lens variant.
    pub fn surcharge(&self) -> Decimal {
        match self {
            LensType::Standard => Decimal::ZERO,
            LensType::BlueLight => dec!(25),
            LensType::Prescription => dec!(50),
        }
    }
}

/// Frame measurements in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSize {
    pub lens_width: f64,
    pub bridge_width: f64,
}

/// An eyewear product as loaded from the catalog store.
///
/// Products are immutable once loaded; the catalog store is the authoritative
/// owner. Identifiers are positive integers assigned monotonically at catalog
/// insertion, so a higher id means a more recently added product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub category: Category,
    pub gender: Gender,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    pub frame_shape: String,
    pub frame_color: String,
    pub frame_material: String,
    pub images: Vec<String>,
    pub rating: f32,
    pub review_count: u32,
    pub in_stock: bool,
    pub features: Vec<String>,
    pub size: FrameSize,
}

impl Product {
    /// The price a buyer actually pays: the discount price when one is set
    /// and positive, otherwise the list price.
    ///
    /// Single source of truth for discount resolution. Filtering, sorting,
    /// pricing, and order snapshots all go through here so the notion of
    /// "price" can never diverge between computation sites.
    pub fn effective_price(&self) -> Decimal {
        self.discount_price
            .filter(|d| *d > Decimal::ZERO)
            .unwrap_or(self.price)
    }

    /// Whether the product is currently discounted.
    pub fn is_on_sale(&self) -> bool {
        matches!(self.discount_price, Some(d) if d > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_prices(price: Decimal, discount: Option<Decimal>) -> Product {
        Product {
            id: 1,
            brand: "Ray-Ban".to_string(),
            model: "Aviator Classic".to_string(),
            description: "Timeless aviator sunglasses".to_string(),
            category: Category::Sunglasses,
            gender: Gender::Unisex,
            price,
            discount_price: discount,
            frame_shape: "aviator".to_string(),
            frame_color: "gold".to_string(),
            frame_material: "metal".to_string(),
            images: vec!["https://cdn.example.com/rb3025.jpg".to_string()],
            rating: 4.8,
            review_count: 321,
            in_stock: true,
            features: vec!["UV protection".to_string()],
            size: FrameSize {
                lens_width: 58.0,
                bridge_width: 14.0,
            },
        }
    }

    // ==================== Effective Price Tests ====================

    #[test]
    fn effective_price_prefers_positive_discount() {
        let product = product_with_prices(dec!(161.00), Some(dec!(129.99)));
        assert_eq!(product.effective_price(), dec!(129.99));
        assert!(product.is_on_sale());
    }

    #[test]
    fn effective_price_falls_back_to_list_price() {
        let product = product_with_prices(dec!(161.00), None);
        assert_eq!(product.effective_price(), dec!(161.00));
        assert!(!product.is_on_sale());
    }

    #[test]
    fn zero_discount_does_not_count_as_sale() {
        let product = product_with_prices(dec!(161.00), Some(Decimal::ZERO));
        assert_eq!(product.effective_price(), dec!(161.00));
        assert!(!product.is_on_sale());
    }

    #[test]
    fn discount_equal_to_price_still_wins() {
        // Eligibility is "present and positive"; the store never enforces
        // discount < price, so an equal discount is still the effective price.
        let product = product_with_prices(dec!(99.00), Some(dec!(99.00)));
        assert_eq!(product.effective_price(), dec!(99.00));
        assert!(product.is_on_sale());
    }

    // ==================== Lens Surcharge Tests ====================

    #[test]
    fn lens_surcharges_are_flat_amounts() {
        assert_eq!(LensType::Standard.surcharge(), Decimal::ZERO);
        assert_eq!(LensType::BlueLight.surcharge(), dec!(25));
        assert_eq!(LensType::Prescription.surcharge(), dec!(50));
    }

    #[test]
    fn lens_type_defaults_to_standard() {
        assert_eq!(LensType::default(), LensType::Standard);
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn product_serializes_with_camel_case_fields() {
        let product = product_with_prices(dec!(161.00), Some(dec!(129.99)));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["discountPrice"], serde_json::json!("129.99"));
        assert_eq!(json["frameShape"], serde_json::json!("aviator"));
        assert_eq!(json["category"], serde_json::json!("sunglasses"));
        assert_eq!(json["gender"], serde_json::json!("unisex"));
        assert_eq!(json["size"]["lensWidth"], serde_json::json!(58.0));
    }

    #[test]
    fn lens_type_uses_kebab_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&LensType::BlueLight).unwrap(),
            "\"blue-light\""
        );
        let parsed: LensType = serde_json::from_str("\"prescription\"").unwrap();
        assert_eq!(parsed, LensType::Prescription);
    }

    #[test]
    fn missing_discount_price_deserializes_to_none() {
        let product = product_with_prices(dec!(95.00), None);
        let json = serde_json::to_string(&product).unwrap();
        assert!(!json.contains("discountPrice"));

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back.discount_price, None);
    }
}
