//! Property-based tests for the catalog query and pricing engines.
//!
//! These use proptest to verify invariants across a wide range of generated
//! catalogs and queries, catching edge cases the example-based suites miss.

mod common;

use std::sync::Arc;

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use visionhub_commerce::entities::{
    CartLineItem, Category, FrameSize, Gender, LensType, Product, ResolvedCartItem,
};
use visionhub_commerce::services::catalog::{filter_products, sort_products};
use visionhub_commerce::prelude::*;

fn money_strategy() -> impl Strategy<Value = Decimal> {
    // 0.00 ..= 999.99, two fraction digits
    (0u64..100_000).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Eyeglasses), Just(Category::Sunglasses)]
}

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Men), Just(Gender::Women), Just(Gender::Unisex)]
}

fn lens_strategy() -> impl Strategy<Value = LensType> {
    prop_oneof![
        Just(LensType::Standard),
        Just(LensType::BlueLight),
        Just(LensType::Prescription),
    ]
}

prop_compose! {
    fn product_strategy()(
        id in 1u32..500,
        brand in prop_oneof!["Ray-Ban", "Oakley", "Persol", "Gucci", "Warby Parker"],
        category in category_strategy(),
        gender in gender_strategy(),
        price in money_strategy(),
        discount in option::of(money_strategy()),
        shape in prop_oneof!["round", "square", "aviator", "cat-eye"],
        rating in 0.0f32..=5.0,
    ) -> Product {
        Product {
            id,
            brand,
            model: format!("Model {id}"),
            description: format!("{shape} {category} frame"),
            category,
            gender,
            price,
            discount_price: discount,
            frame_shape: shape,
            frame_color: "black".to_string(),
            frame_material: "acetate".to_string(),
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            rating,
            review_count: 10,
            in_stock: true,
            features: vec![],
            size: FrameSize { lens_width: 52.0, bridge_width: 18.0 },
        }
    }
}

prop_compose! {
    fn query_strategy()(
        category in option::of(prop_oneof!["eyeglasses", "sunglasses", "all"]),
        gender in option::of(prop_oneof!["men", "women", "all"]),
        brands in vec(prop_oneof!["Ray-Ban", "Oakley", "Persol"], 0..3),
        bounds in option::of((money_strategy(), money_strategy())),
        search in option::of(prop_oneof!["ray", "model", "all", "zzz"]),
    ) -> ProductQuery {
        ProductQuery {
            category,
            gender,
            brand: brands,
            price_range: bounds.map(|(a, b)| PriceRange { min: a.min(b), max: a.max(b) }),
            search,
            ..Default::default()
        }
    }
}

fn sort_key_strategy() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::PriceLow),
        Just(SortKey::PriceHigh),
        Just(SortKey::Rating),
        Just(SortKey::Newest),
    ]
}

/// Re-states every filter predicate independently of the engine.
fn satisfies(product: &Product, query: &ProductQuery) -> bool {
    let dimension = |value: &Option<String>| -> Option<String> {
        value
            .as_deref()
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
            .map(str::to_lowercase)
    };

    if let Some(category) = dimension(&query.category) {
        if product.category.to_string() != category {
            return false;
        }
    }
    if let Some(gender) = dimension(&query.gender) {
        if product.gender != Gender::Unisex && product.gender.to_string() != gender {
            return false;
        }
    }
    if !query.brand.is_empty() && !query.brand.contains(&product.brand) {
        return false;
    }
    if let Some(range) = &query.price_range {
        let price = product.effective_price();
        if price < range.min || price > range.max {
            return false;
        }
    }
    // Free text has no "all" sentinel; only blank disables it
    if let Some(needle) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
    {
        let hit = product.brand.to_lowercase().contains(&needle)
            || product.model.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

// Property 1: filtering yields a subset and every member satisfies the query
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn filter_returns_a_satisfying_subset(
        products in vec(product_strategy(), 0..40),
        query in query_strategy(),
    ) {
        let result = filter_products(&products, &query);

        prop_assert!(result.len() <= products.len());
        for item in &result {
            prop_assert!(products.contains(item), "result contains a foreign product");
            prop_assert!(satisfies(item, &query), "filtered product violates the query");
        }
        // Nothing satisfying was dropped
        let expected = products.iter().filter(|p| satisfies(p, &query)).count();
        prop_assert_eq!(result.len(), expected);
    }
}

// Property 2: sorting is idempotent and stable under equal keys
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn sort_is_idempotent(
        products in vec(product_strategy(), 0..40),
        key in sort_key_strategy(),
    ) {
        let mut once = products;
        sort_products(&mut once, Some(key));
        let mut twice = once.clone();
        sort_products(&mut twice, Some(key));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sort_by_price_is_stable_and_ordered(
        products in vec(product_strategy(), 0..40),
    ) {
        // Tag input positions so stability is observable
        let indexed: Vec<Product> = products
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| { p.review_count = i as u32; p })
            .collect();

        let mut sorted = indexed;
        sort_products(&mut sorted, Some(SortKey::PriceLow));

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.effective_price() <= b.effective_price());
            if a.effective_price() == b.effective_price() {
                prop_assert!(a.review_count < b.review_count, "equal keys reordered");
            }
        }
    }
}

// Property 9: the discount wins whenever present and positive
proptest! {
    #[test]
    fn effective_price_picks_positive_discounts(
        price in money_strategy(),
        discount in option::of(money_strategy()),
    ) {
        let mut product = common::product(1, "Ray-Ban", "Aviator Classic");
        product.price = price;
        product.discount_price = discount;

        let expected = match discount {
            Some(d) if d > Decimal::ZERO => d,
            _ => price,
        };
        prop_assert_eq!(product.effective_price(), expected);
    }
}

// Pricing invariants: threshold exclusivity and breakdown consistency
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn price_breakdown_is_internally_consistent(
        lines in vec((money_strategy(), 1u32..5, lens_strategy()), 1..8),
    ) {
        let pricing = PricingService::new(Arc::new(AppConfig::default()));
        let items: Vec<ResolvedCartItem> = lines
            .iter()
            .enumerate()
            .map(|(i, (price, quantity, lens))| {
                let mut product = common::product(i as u32 + 1, "Oakley", "Holbrook");
                product.price = *price;
                product.discount_price = None;
                ResolvedCartItem::new(
                    CartLineItem {
                        id: i as u32 + 1,
                        product_id: i as u32 + 1,
                        quantity: *quantity,
                        lens_type: *lens,
                        prescription: None,
                    },
                    product,
                )
            })
            .collect();

        let raw_subtotal: Decimal = items.iter().map(|i| i.line_total()).sum();
        let breakdown = pricing.price_items(&items);

        prop_assert_eq!(breakdown.subtotal, raw_subtotal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));

        // Shipping: free strictly above 100, 9.99 otherwise
        if raw_subtotal > Decimal::new(10_000, 2) {
            prop_assert_eq!(breakdown.shipping, Decimal::ZERO);
        } else {
            prop_assert_eq!(breakdown.shipping, Decimal::new(999, 2));
        }

        // Tax is 8% of the unrounded subtotal, rounded at presentation
        let expected_tax = (raw_subtotal * Decimal::new(8, 2)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(breakdown.tax, expected_tax);

        // Total equals the rounded full-precision sum
        let expected_total =
            (raw_subtotal + breakdown.shipping + raw_subtotal * Decimal::new(8, 2)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(breakdown.total, expected_total);
    }
}
