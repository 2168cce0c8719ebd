//! Catalog file commands.
//!
//! # Usage
//!
//! ```bash
//! preface-cli catalog check path/to/catalog.json
//! ```
//!
//! Runs the same validation the storefront runs at startup, so a bad file is
//! caught before a deploy.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;

use preface_core::{Catalog, CatalogError, format_price};

/// Errors that can occur while checking a catalog.
#[derive(Debug, Error)]
pub enum CatalogCheckError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// Figures reported for a valid catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogSummary {
    pub products: usize,
    pub active: usize,
    pub out_of_stock: usize,
    pub by_batch: BTreeMap<String, usize>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl CatalogSummary {
    fn of(catalog: &Catalog) -> Self {
        let products = catalog.products();
        let mut by_batch = BTreeMap::new();
        for product in products {
            *by_batch.entry(product.batch.to_string()).or_insert(0) += 1;
        }

        Self {
            products: products.len(),
            active: products.iter().filter(|p| p.is_active).count(),
            out_of_stock: products.iter().filter(|p| p.stock == 0).count(),
            by_batch,
            min_price: products.iter().map(|p| p.price).min(),
            max_price: products.iter().map(|p| p.price).max(),
        }
    }
}

/// Validate the catalog at `path` and log a summary.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn check(path: &Path) -> Result<CatalogSummary, CatalogCheckError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogCheckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let summary = CatalogSummary::of(&Catalog::from_json(&json)?);

    tracing::info!(
        path = %path.display(),
        products = summary.products,
        active = summary.active,
        out_of_stock = summary.out_of_stock,
        "Catalog is valid"
    );
    for (batch, count) in &summary.by_batch {
        tracing::info!("{batch}: {count} products");
    }
    if let (Some(min), Some(max)) = (summary.min_price, summary.max_price) {
        tracing::info!("Prices range from {} to {}", format_price(min), format_price(max));
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_summary() {
        let catalog = Catalog::from_json(preface_storefront::db::BUNDLED_CATALOG).unwrap();
        let summary = CatalogSummary::of(&catalog);
        assert_eq!(summary.products, 18);
        assert_eq!(summary.active, 18);
        assert_eq!(summary.out_of_stock, 0);
        assert_eq!(summary.by_batch.values().sum::<usize>(), 18);
        assert!(summary.min_price <= summary.max_price);
    }

    #[test]
    fn test_missing_file() {
        let err = check(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogCheckError::Io { .. }));
    }

    #[test]
    fn test_invalid_file() {
        let path = std::env::temp_dir().join(format!("preface-catalog-{}.json", std::process::id()));
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();
        let err = check(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, CatalogCheckError::Invalid(CatalogError::Parse(_))));
    }
}
