//! Product catalog.
//!
//! The catalog is an ordered list of [`Product`]s loaded from JSON. It answers
//! storefront queries, hands the cart a [`LineItemCandidate`] when a shopper
//! picks a size, and accepts admin edits.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::LineItemCandidate;
use crate::types::{Page, ProductId};

/// Errors raised while loading or editing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "T-Shirts")]
    TShirts,
    Pants,
    Shoes,
    Accessories,
}

/// Release batch a product dropped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Batch {
    #[serde(rename = "Batch 1")]
    One,
    #[serde(rename = "Batch 2")]
    Two,
    #[serde(rename = "Batch 3")]
    Three,
}

impl Category {
    /// Display name, as used in the catalog JSON.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TShirts => "T-Shirts",
            Self::Pants => "Pants",
            Self::Shoes => "Shoes",
            Self::Accessories => "Accessories",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Batch {
    /// Display name, as used in the catalog JSON.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "Batch 1",
            Self::Two => "Batch 2",
            Self::Three => "Batch 3",
        }
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer review shown on the product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL handle; derived from the name when the source omits it.
    #[serde(default)]
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub image: String,
    pub category: Category,
    pub batch: Batch,
    pub sizes: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub new_release: bool,
    #[serde(default)]
    pub release_volume: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// Whether `size` is one of this product's variants.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Snapshot this product into a cart candidate for `size`.
    ///
    /// Returns `None` if the product does not come in that size.
    #[must_use]
    pub fn candidate(&self, size: &str) -> Option<LineItemCandidate> {
        self.offers_size(size).then(|| LineItemCandidate {
            product_id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            size: size.to_owned(),
            unit_price: self.price,
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidProduct {
            id: self.id.to_string(),
            reason: reason.to_owned(),
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if self.price.is_sign_negative() {
            return Err(invalid("price cannot be negative"));
        }
        if self.sizes.is_empty() {
            return Err(invalid("at least one size is required"));
        }
        Ok(())
    }
}

/// Lower-case, dash-separated handle for a product name.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Storefront listing filters.
///
/// Deserializes straight from a query string. `include_inactive` is never
/// read from the request; only the admin API turns it on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub batch: Option<Batch>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub bestseller: Option<bool>,
    pub new_release: Option<bool>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
    #[serde(skip)]
    pub include_inactive: bool,
}

impl ProductQuery {
    fn matches(&self, product: &Product) -> bool {
        if !self.include_inactive && !product.is_active {
            return false;
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.batch.is_some_and(|b| b != product.batch) {
            return false;
        }
        if self.bestseller.is_some_and(|b| b != product.bestseller) {
            return false;
        }
        if self.new_release.is_some_and(|n| n != product.new_release) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return product
                .name
                .to_lowercase()
                .contains(&search.to_lowercase());
        }
        true
    }
}

/// Fields for a product created from the admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub image: String,
    pub category: Category,
    pub batch: Batch,
    pub sizes: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub new_release: bool,
    #[serde(default)]
    pub release_volume: Option<String>,
}

/// Partial product update; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub batch: Option<Batch>,
    pub sizes: Option<Vec<String>>,
    pub stock: Option<u32>,
    pub bestseller: Option<bool>,
    pub new_release: Option<bool>,
    pub release_volume: Option<String>,
    pub is_active: Option<bool>,
}

/// The ordered product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, validating each one.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or an invalid product.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(products.len());

        for mut product in products {
            product.validate()?;
            if !seen.insert(product.id.clone()) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.slug.is_empty() {
                product.slug = slugify(&product.name);
            }
            normalized.push(product);
        }

        Ok(Self {
            products: normalized,
        })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a product is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products, including inactive ones, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    pub fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == *id)
    }

    /// A product shoppers can see and buy.
    #[must_use]
    pub fn get_active(&self, id: &ProductId) -> Option<&Product> {
        self.get(id).filter(|p| p.is_active)
    }

    #[must_use]
    pub fn get_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.is_active && p.slug == slug)
    }

    /// Filter and paginate.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Page<Product> {
        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        Page::from_vec(matching, query.skip, query.limit)
    }

    /// The id the next created product receives: one past the largest
    /// numeric id, or `"1"` for a catalog with no numeric ids.
    #[must_use]
    pub fn next_id(&self) -> ProductId {
        let max = self
            .products
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        ProductId::new(max.saturating_add(1).to_string())
    }

    /// Append a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is invalid.
    pub fn insert(&mut self, new: NewProduct, now: DateTime<Utc>) -> Result<Product, CatalogError> {
        let product = Product {
            id: self.next_id(),
            slug: slugify(&new.name),
            name: new.name,
            description: new.description,
            price: new.price,
            original_price: new.original_price,
            image: new.image,
            category: new.category,
            batch: new.batch,
            sizes: new.sizes,
            rating: 0.0,
            reviews: Vec::new(),
            bestseller: new.bestseller,
            new_release: new.new_release,
            release_volume: new.release_volume,
            stock: new.stock,
            is_active: true,
            created_at: now,
            updated_at: None,
        };
        product.validate()?;
        self.products.push(product.clone());
        Ok(product)
    }

    /// Apply a partial update. `Ok(None)` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error (and leaves the product unchanged) if the update would
    /// make the product invalid.
    pub fn update(
        &mut self,
        id: &ProductId,
        update: ProductUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, CatalogError> {
        let Some(product) = self.get_mut(id) else {
            return Ok(None);
        };

        let mut next = product.clone();
        if let Some(name) = update.name {
            next.slug = slugify(&name);
            next.name = name;
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(price) = update.price {
            next.price = price;
        }
        if let Some(original_price) = update.original_price {
            next.original_price = Some(original_price);
        }
        if let Some(image) = update.image {
            next.image = image;
        }
        if let Some(category) = update.category {
            next.category = category;
        }
        if let Some(batch) = update.batch {
            next.batch = batch;
        }
        if let Some(sizes) = update.sizes {
            next.sizes = sizes;
        }
        if let Some(stock) = update.stock {
            next.stock = stock;
        }
        if let Some(bestseller) = update.bestseller {
            next.bestseller = bestseller;
        }
        if let Some(new_release) = update.new_release {
            next.new_release = new_release;
        }
        if let Some(release_volume) = update.release_volume {
            next.release_volume = Some(release_volume);
        }
        if let Some(is_active) = update.is_active {
            next.is_active = is_active;
        }
        next.updated_at = Some(now);
        next.validate()?;

        *product = next.clone();
        Ok(Some(next))
    }

    /// Soft-delete: hide the product from shoppers. Returns `false` if absent.
    pub fn deactivate(&mut self, id: &ProductId, now: DateTime<Utc>) -> bool {
        self.get_mut(id).is_some_and(|product| {
            product.is_active = false;
            product.updated_at = Some(now);
            true
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "1", "name": "Essential Black Tee", "description": "Premium cotton.", "price": "45.00",
         "image": "/assets/product-tshirt.jpg", "category": "T-Shirts", "batch": "Batch 1",
         "sizes": ["S", "M", "L"], "rating": 4.8, "bestseller": true, "new_release": true, "stock": 25},
        {"id": "2", "name": "Urban Cargo Pants", "description": "Cargo.", "price": "89.00",
         "image": "/assets/product-pants.jpg", "category": "Pants", "batch": "Batch 1",
         "sizes": ["28", "30"], "stock": 10},
        {"id": "15", "name": "Platform Sneakers", "description": "Bold.", "price": "155.00",
         "image": "/assets/product-shoes.jpg", "category": "Shoes", "batch": "Batch 3",
         "sizes": ["9", "10"], "new_release": true, "stock": 4, "is_active": false}
    ]"#;

    fn catalog() -> Catalog {
        Catalog::from_json(SAMPLE).unwrap()
    }

    #[test]
    fn test_from_json_fills_slugs() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        let tee = catalog.get(&ProductId::from("1")).unwrap();
        assert_eq!(tee.slug, "essential-black-tee");
        assert_eq!(tee.category, Category::TShirts);
        assert!(tee.is_active);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "1", "name": "A", "description": "", "price": "1", "image": "", "category": "Pants", "batch": "Batch 1", "sizes": ["M"]},
            {"id": "1", "name": "B", "description": "", "price": "1", "image": "", "category": "Pants", "batch": "Batch 1", "sizes": ["M"]}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_invalid_product_rejected() {
        let json = r#"[{"id": "1", "name": "A", "description": "", "price": "-1", "image": "", "category": "Pants", "batch": "Batch 1", "sizes": ["M"]}]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::InvalidProduct { .. })
        ));
    }

    #[test]
    fn test_candidate_requires_offered_size() {
        let catalog = catalog();
        let tee = catalog.get(&ProductId::from("1")).unwrap();

        let candidate = tee.candidate("M").unwrap();
        assert_eq!(candidate.unit_price, Decimal::new(4500, 2));
        assert_eq!(candidate.name, "Essential Black Tee");
        assert!(tee.candidate("XXL").is_none());
    }

    #[test]
    fn test_query_hides_inactive_products() {
        let page = catalog().query(&ProductQuery::default());
        assert_eq!(page.total, 2);

        let page = catalog().query(&ProductQuery {
            include_inactive: true,
            ..ProductQuery::default()
        });
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_query_filters() {
        let catalog = catalog();

        let pants = catalog.query(&ProductQuery {
            category: Some(Category::Pants),
            ..ProductQuery::default()
        });
        assert_eq!(pants.items.len(), 1);

        let cheap = catalog.query(&ProductQuery {
            max_price: Some(Decimal::from(50)),
            ..ProductQuery::default()
        });
        assert_eq!(cheap.items.first().unwrap().id, ProductId::from("1"));

        let search = catalog.query(&ProductQuery {
            search: Some("CARGO".to_string()),
            ..ProductQuery::default()
        });
        assert_eq!(search.items.first().unwrap().id, ProductId::from("2"));

        let bestsellers = catalog.query(&ProductQuery {
            bestseller: Some(true),
            ..ProductQuery::default()
        });
        assert_eq!(bestsellers.total, 1);
    }

    #[test]
    fn test_query_from_query_string_values() {
        let query: ProductQuery =
            serde_json::from_value(serde_json::json!({"category": "T-Shirts", "batch": "Batch 1"}))
                .unwrap();
        assert_eq!(query.category, Some(Category::TShirts));
        assert_eq!(query.batch, Some(Batch::One));
        assert!(!query.include_inactive);
    }

    #[test]
    fn test_next_id_and_insert() {
        let mut catalog = catalog();
        assert_eq!(catalog.next_id(), ProductId::from("16"));

        let product = catalog
            .insert(
                NewProduct {
                    name: "Chain Necklace".to_string(),
                    description: String::new(),
                    price: Decimal::from(30),
                    original_price: None,
                    image: String::new(),
                    category: Category::Accessories,
                    batch: Batch::Three,
                    sizes: vec!["One Size".to_string()],
                    stock: 12,
                    bestseller: false,
                    new_release: true,
                    release_volume: None,
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(product.id, ProductId::from("16"));
        assert_eq!(product.slug, "chain-necklace");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_update_is_partial_and_validated() {
        let mut catalog = catalog();
        let id = ProductId::from("2");

        let updated = catalog
            .update(
                &id,
                ProductUpdate {
                    price: Some(Decimal::from(79)),
                    ..ProductUpdate::default()
                },
                Utc::now(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, Decimal::from(79));
        assert_eq!(updated.name, "Urban Cargo Pants");
        assert!(updated.updated_at.is_some());

        let rejected = catalog.update(
            &id,
            ProductUpdate {
                sizes: Some(Vec::new()),
                ..ProductUpdate::default()
            },
            Utc::now(),
        );
        assert!(rejected.is_err());
        assert_eq!(catalog.get(&id).unwrap().sizes.len(), 2);

        let missing = catalog
            .update(&ProductId::from("99"), ProductUpdate::default(), Utc::now())
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_deactivate() {
        let mut catalog = catalog();
        assert!(catalog.deactivate(&ProductId::from("1"), Utc::now()));
        assert!(catalog.get_active(&ProductId::from("1")).is_none());
        assert!(!catalog.deactivate(&ProductId::from("404"), Utc::now()));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("High-Top Sneakers"), "high-top-sneakers");
        assert_eq!(slugify("  Slip-On  Sneakers!"), "slip-on-sneakers");
    }
}
