//! Product repository.

use chrono::Utc;

use preface_core::{NewProduct, Page, Product, ProductId, ProductQuery, ProductUpdate};

use super::{Database, RepositoryError};

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    db: &'a Database,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Filter and paginate the catalog.
    pub async fn list(&self, query: &ProductQuery) -> Page<Product> {
        self.db.read().await.catalog.query(query)
    }

    /// Get a product shoppers can see.
    pub async fn get_active(&self, id: &ProductId) -> Option<Product> {
        self.db.read().await.catalog.get_active(id).cloned()
    }

    /// Get an active product by its URL handle.
    pub async fn get_by_slug(&self, slug: &str) -> Option<Product> {
        self.db.read().await.catalog.get_by_slug(slug).cloned()
    }

    /// Get any product, active or not.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.db.read().await.catalog.get(id).cloned()
    }

    /// Number of active products.
    pub async fn count_active(&self) -> usize {
        self.db
            .read()
            .await
            .catalog
            .products()
            .iter()
            .filter(|p| p.is_active)
            .count()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the product fails validation.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        self.db
            .write()
            .await
            .catalog
            .insert(new, Utc::now())
            .map_err(|e| RepositoryError::Invalid(e.to_string()))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Invalid` if the update fails validation.
    pub async fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RepositoryError> {
        self.db
            .write()
            .await
            .catalog
            .update(id, update, Utc::now())
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Hide a product from shoppers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn deactivate(&self, id: &ProductId) -> Result<(), RepositoryError> {
        if self.db.write().await.catalog.deactivate(id, Utc::now()) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn db() -> Database {
        Database::seeded(None).unwrap()
    }

    #[tokio::test]
    async fn test_deactivated_product_hidden_from_shoppers() {
        let db = db();
        let products = db.products();
        let id = ProductId::from("4");

        products.deactivate(&id).await.unwrap();

        assert!(products.get_active(&id).await.is_none());
        assert!(products.get(&id).await.is_some());
        assert_eq!(products.count_active().await, 17);
        assert_eq!(products.list(&ProductQuery::default()).await.total, 17);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let db = db();
        let new: NewProduct = serde_json::from_value(serde_json::json!({
            "name": "Logo Cap",
            "price": "30.00",
            "category": "Accessories",
            "batch": "Batch 3",
            "sizes": ["One Size"],
            "stock": 50
        }))
        .unwrap();

        let product = db.products().create(new).await.unwrap();
        assert_eq!(product.id, ProductId::from("19"));
        assert_eq!(product.slug, "logo-cap");
        assert_eq!(db.products().get_by_slug("logo-cap").await.unwrap().price, Decimal::from(30));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let err = db()
            .products()
            .update(&ProductId::from("404"), ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_invalid_update_rejected() {
        let db = db();
        let update = ProductUpdate {
            sizes: Some(Vec::new()),
            ..ProductUpdate::default()
        };
        let err = db.products().update(&ProductId::from("1"), update).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Invalid(_)));
        assert_eq!(db.products().get(&ProductId::from("1")).await.unwrap().sizes.len(), 5);
    }
}
