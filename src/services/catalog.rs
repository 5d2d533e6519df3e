use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{instrument, warn};

use crate::entities::{Gender, Product};
use crate::errors::{ServiceError, StoreError};
use crate::store::ProductStore;

/// How many related products to suggest on a product detail page.
const DEFAULT_RELATED_LIMIT: usize = 4;
/// How many results the header quick-search dropdown shows.
const DEFAULT_QUICK_SEARCH_LIMIT: usize = 8;

/// Sort orders supported by the catalog listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Ascending effective price
    #[serde(rename = "price-low")]
    PriceLow,
    /// Descending effective price
    #[serde(rename = "price-high")]
    PriceHigh,
    /// Descending rating
    #[serde(rename = "rating")]
    Rating,
    /// Descending identifier; ids are assigned monotonically at catalog
    /// insertion, so this is a recency proxy
    #[serde(rename = "newest")]
    Newest,
}

impl SortKey {
    /// Parses a sort key leniently: unrecognized strings mean "no sort",
    /// never an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            "rating" => Some(Self::Rating),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }
}

/// Inclusive effective-price bounds for a catalog query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Filter and sort specification for a catalog listing.
///
/// Every field is optional; the default query matches the whole catalog in
/// catalog order. Dimensions combine with logical AND; values inside a
/// multi-value dimension combine with logical OR.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    /// Category name; "all" or absent disables the dimension.
    pub category: Option<String>,
    /// Gender name; unisex products pass any gender filter. "all" or absent
    /// disables the dimension.
    pub gender: Option<String>,
    pub frame_shape: Vec<String>,
    pub frame_color: Vec<String>,
    pub brand: Vec<String>,
    pub price_range: Option<PriceRange>,
    /// Free-text needle matched case-insensitively against brand, model,
    /// and description.
    pub search: Option<String>,
    #[serde(deserialize_with = "lenient_sort_key")]
    pub sort_by: Option<SortKey>,
}

/// Deserializes a sort key, mapping unknown strings to `None` instead of
/// failing the whole query object.
fn lenient_sort_key<'de, D>(deserializer: D) -> Result<Option<SortKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SortKey::parse))
}

/// Treats `None`, empty strings, and the literal "all" as "dimension off".
/// Only the closed-vocabulary dimensions (category, gender) use the "all"
/// sentinel; free text goes through [`search_needle`].
fn dimension_enabled(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// A search term is disabled only when absent or blank. "all" is a literal
/// needle here, not a sentinel: someone can search for it.
fn search_needle(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Whether a single product satisfies every predicate of the query.
fn matches_query(product: &Product, query: &ProductQuery) -> bool {
    if let Some(category) = dimension_enabled(&query.category) {
        if !product.category.to_string().eq_ignore_ascii_case(category) {
            return false;
        }
    }

    if let Some(gender) = dimension_enabled(&query.gender) {
        let passes = product.gender == Gender::Unisex
            || product.gender.to_string().eq_ignore_ascii_case(gender);
        if !passes {
            return false;
        }
    }

    if !query.frame_shape.is_empty() && !query.frame_shape.contains(&product.frame_shape) {
        return false;
    }
    if !query.frame_color.is_empty() && !query.frame_color.contains(&product.frame_color) {
        return false;
    }
    if !query.brand.is_empty() && !query.brand.contains(&product.brand) {
        return false;
    }

    if let Some(range) = &query.price_range {
        if !range.contains(product.effective_price()) {
            return false;
        }
    }

    if let Some(needle) = search_needle(&query.search) {
        let needle = needle.to_lowercase();
        let haystacks = [&product.brand, &product.model, &product.description];
        if !haystacks
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    true
}

/// Narrows a product list to the subset satisfying the query.
///
/// Pure and infallible: any query against any list (including an empty one)
/// yields a plain subset in input order.
pub fn filter_products(products: &[Product], query: &ProductQuery) -> Vec<Product> {
    products
        .iter()
        .filter(|p| matches_query(p, query))
        .cloned()
        .collect()
}

/// Stable in-place sort by the given key; `None` leaves input order intact.
pub fn sort_products(products: &mut [Product], key: Option<SortKey>) {
    let Some(key) = key else {
        return;
    };
    match key {
        SortKey::PriceLow => products.sort_by_key(|p| p.effective_price()),
        SortKey::PriceHigh => products.sort_by_key(|p| std::cmp::Reverse(p.effective_price())),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => products.sort_by_key(|p| std::cmp::Reverse(p.id)),
    }
}

/// Distinct catalog vocabulary backing the filter sidebar controls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub frame_shapes: Vec<String>,
    pub frame_colors: Vec<String>,
    pub frame_materials: Vec<String>,
    /// Min/max effective price across the catalog; `None` for an empty
    /// catalog.
    pub price_range: Option<PriceRange>,
}

/// Catalog read service: listing, lookup, related products, quick search,
/// and facet aggregation over the product store.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Fetches the catalog and degrades a store outage to an empty list.
    ///
    /// Collection reads are best-effort: the storefront renders an empty
    /// shelf rather than an error page when the backend is unreachable.
    async fn fetch_all_degraded(&self) -> Vec<Product> {
        match self.products.fetch_products().await {
            Ok(products) => products,
            Err(StoreError::Unavailable(msg)) => {
                warn!(error = %msg, "Catalog store unavailable; returning empty product list");
                Vec::new()
            }
        }
    }

    /// Lists products matching the query, sorted per its `sort_by` key.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Vec<Product> {
        let products = self.fetch_all_degraded().await;
        let mut matched = filter_products(&products, query);
        sort_products(&mut matched, query.sort_by);
        matched
    }

    /// Looks up a single product.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: u32) -> Result<Product, ServiceError> {
        self.products
            .fetch_product_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    /// Products sharing the subject's category or frame shape, excluding the
    /// subject itself, in catalog order, truncated to `limit`
    /// (default 4).
    #[instrument(skip(self))]
    pub async fn related_products(
        &self,
        id: u32,
        limit: Option<usize>,
    ) -> Result<Vec<Product>, ServiceError> {
        let subject = self.get_product(id).await?;
        let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT);

        let related = self
            .fetch_all_degraded()
            .await
            .into_iter()
            .filter(|p| {
                p.id != subject.id
                    && (p.category == subject.category || p.frame_shape == subject.frame_shape)
            })
            .take(limit)
            .collect();
        Ok(related)
    }

    /// Header search box: case-insensitive substring match against brand,
    /// model, category, and frame shape, truncated to `limit` (default 8).
    /// A blank term yields no results.
    #[instrument(skip(self))]
    pub async fn quick_search(&self, term: &str, limit: Option<usize>) -> Vec<Product> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let limit = limit.unwrap_or(DEFAULT_QUICK_SEARCH_LIMIT);

        self.fetch_all_degraded()
            .await
            .into_iter()
            .filter(|p| {
                p.brand.to_lowercase().contains(&needle)
                    || p.model.to_lowercase().contains(&needle)
                    || p.category.to_string().contains(&needle)
                    || p.frame_shape.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Aggregates the distinct, sorted attribute vocabulary of the catalog
    /// for the filter sidebar.
    #[instrument(skip(self))]
    pub async fn filter_options(&self) -> FilterOptions {
        let products = self.fetch_all_degraded().await;

        let mut brands = BTreeSet::new();
        let mut frame_shapes = BTreeSet::new();
        let mut frame_colors = BTreeSet::new();
        let mut frame_materials = BTreeSet::new();
        let mut price_range: Option<PriceRange> = None;

        for product in &products {
            brands.insert(product.brand.clone());
            frame_shapes.insert(product.frame_shape.clone());
            frame_colors.insert(product.frame_color.clone());
            frame_materials.insert(product.frame_material.clone());

            let price = product.effective_price();
            price_range = Some(match price_range {
                None => PriceRange {
                    min: price,
                    max: price,
                },
                Some(range) => PriceRange {
                    min: range.min.min(price),
                    max: range.max.max(price),
                },
            });
        }

        FilterOptions {
            brands: brands.into_iter().collect(),
            frame_shapes: frame_shapes.into_iter().collect(),
            frame_colors: frame_colors.into_iter().collect(),
            frame_materials: frame_materials.into_iter().collect(),
            price_range,
        }
    }
}
