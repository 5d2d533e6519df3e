use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use visionhub_commerce::prelude::*;

/// Test harness: the full service stack over a shared in-memory store,
/// pre-seeded with a small eyewear catalog.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    /// Kept alive so event sends never fail during tests.
    #[allow(dead_code)]
    pub events: mpsc::Receiver<Event>,
}

impl TestApp {
    /// Fresh app with the default config and the seeded catalog.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::with_products(seed_catalog()));
        let (state, events) = AppState::in_memory(AppConfig::default(), store.clone());
        Self {
            state,
            store,
            events,
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.state.services.catalog
    }

    pub fn cart(&self) -> &CartService {
        &self.state.services.cart
    }

    pub fn orders(&self) -> &OrderService {
        &self.state.services.orders
    }
}

/// A product builder with sensible eyewear defaults.
pub fn product(id: u32, brand: &str, model: &str) -> Product {
    Product {
        id,
        brand: brand.to_string(),
        model: model.to_string(),
        description: format!("{model} by {brand}"),
        category: Category::Sunglasses,
        gender: Gender::Unisex,
        price: dec!(100.00),
        discount_price: None,
        frame_shape: "round".to_string(),
        frame_color: "black".to_string(),
        frame_material: "acetate".to_string(),
        images: vec![format!("https://cdn.visionhub.shop/products/{id}.jpg")],
        rating: 4.0,
        review_count: 25,
        in_stock: true,
        features: vec!["UV400 protection".to_string()],
        size: FrameSize {
            lens_width: 52.0,
            bridge_width: 18.0,
        },
    }
}

/// Six products spanning both categories, all genders, a discount, and a
/// varied attribute vocabulary.
pub fn seed_catalog() -> Vec<Product> {
    vec![
        Product {
            category: Category::Sunglasses,
            gender: Gender::Unisex,
            price: dec!(161.00),
            discount_price: Some(dec!(129.99)),
            frame_shape: "aviator".to_string(),
            frame_color: "gold".to_string(),
            frame_material: "metal".to_string(),
            rating: 4.8,
            review_count: 321,
            ..product(1, "Ray-Ban", "Aviator Classic")
        },
        Product {
            category: Category::Sunglasses,
            gender: Gender::Men,
            price: dec!(136.00),
            frame_shape: "square".to_string(),
            frame_color: "matte black".to_string(),
            frame_material: "plastic".to_string(),
            rating: 4.6,
            review_count: 210,
            ..product(2, "Oakley", "Holbrook")
        },
        Product {
            category: Category::Eyeglasses,
            gender: Gender::Unisex,
            price: dec!(95.00),
            frame_shape: "round".to_string(),
            frame_color: "crystal".to_string(),
            rating: 4.5,
            review_count: 96,
            ..product(3, "Warby Parker", "Percey")
        },
        Product {
            category: Category::Sunglasses,
            gender: Gender::Women,
            price: dec!(380.00),
            discount_price: Some(dec!(299.00)),
            frame_shape: "cat-eye".to_string(),
            frame_color: "havana".to_string(),
            rating: 4.7,
            review_count: 65,
            ..product(4, "Gucci", "GG0396S")
        },
        Product {
            category: Category::Sunglasses,
            gender: Gender::Men,
            price: dec!(267.00),
            frame_shape: "round".to_string(),
            frame_color: "havana".to_string(),
            rating: 4.9,
            review_count: 87,
            ..product(5, "Persol", "PO3019S")
        },
        Product {
            category: Category::Eyeglasses,
            gender: Gender::Women,
            price: dec!(45.50),
            frame_shape: "rectangle".to_string(),
            frame_color: "navy blue".to_string(),
            frame_material: "metal".to_string(),
            rating: 4.2,
            review_count: 40,
            ..product(6, "Vision Classics", "Metro Slim")
        },
    ]
}

/// A checkout form that passes validation.
#[allow(dead_code)]
pub fn checkout_input() -> CreateOrderInput {
    serde_json::from_value(serde_json::json!({
        "shippingAddress": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "12 Analytical Way",
            "city": "New York",
            "state": "NY",
            "zipCode": "10001"
        },
        "contactInfo": {
            "email": "ada@example.com",
            "phone": "555-0100"
        }
    }))
    .expect("checkout fixture deserializes")
}

/// Sum of line quantities a given product contributes to the cart view.
#[allow(dead_code)]
pub fn quantity_of(view: &CartView, product_id: u32) -> u32 {
    view.items
        .iter()
        .filter(|i| i.product.id == product_id)
        .map(|i| i.quantity)
        .sum()
}
