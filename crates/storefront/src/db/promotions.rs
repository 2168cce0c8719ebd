//! Promotion repository.

use chrono::Utc;
use serde::Deserialize;

use preface_core::promotion::normalize_code;
use preface_core::{Page, Promotion, PromotionId, PromotionInput};

use super::{Database, RepositoryError, Tables};

/// Admin promotion listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionQuery {
    /// Only promotions that are active and inside their date window.
    #[serde(default)]
    pub active_only: bool,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Repository for promotion operations.
pub struct PromotionRepository<'a> {
    db: &'a Database,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List promotions, newest first.
    pub async fn list(&self, query: &PromotionQuery) -> Page<Promotion> {
        let now = Utc::now();
        let matching = self
            .db
            .read()
            .await
            .promotions
            .values()
            .rev()
            .filter(|p| !query.active_only || p.is_live(now))
            .cloned()
            .collect();
        Page::from_vec(matching, query.skip, query.limit)
    }

    /// Get a promotion by id.
    pub async fn get(&self, id: PromotionId) -> Option<Promotion> {
        self.db.read().await.promotions.get(&id).cloned()
    }

    /// Get a promotion by code, case-insensitively.
    pub async fn get_by_code(&self, code: &str) -> Option<Promotion> {
        self.db.read().await.promotion_by_code(code).cloned()
    }

    /// Create a promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is taken.
    /// Returns `RepositoryError::Invalid` if the input is inconsistent.
    pub async fn create(&self, input: PromotionInput) -> Result<Promotion, RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.promotion_by_code(&input.code).is_some() {
            return Err(RepositoryError::Conflict("Promotion code already exists".to_string()));
        }

        let id = tables.next_promotion_id();
        let promotion =
            Promotion::create(id, input, Utc::now()).map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        tables.promotions.insert(id, promotion.clone());
        Ok(promotion)
    }

    /// Replace a promotion's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion does not exist.
    /// Returns `RepositoryError::Conflict` if another promotion uses the code.
    /// Returns `RepositoryError::Invalid` if the input is inconsistent.
    pub async fn replace(&self, id: PromotionId, input: PromotionInput) -> Result<Promotion, RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.promotion_by_code(&input.code).is_some_and(|other| other.id != id) {
            return Err(RepositoryError::Conflict("Promotion code already exists".to_string()));
        }

        let promotion = tables.promotions.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        promotion
            .replace(input, Utc::now())
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        Ok(promotion.clone())
    }

    /// Deactivate a promotion. Promotions are never removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion does not exist.
    pub async fn deactivate(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        let promotion = tables.promotions.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        promotion.is_active = false;
        promotion.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl Tables {
    pub(crate) fn promotion_by_code(&self, code: &str) -> Option<&Promotion> {
        let code = normalize_code(code);
        self.promotions.values().find(|p| p.code == code)
    }

    pub(crate) fn promotion_by_code_mut(&mut self, code: &str) -> Option<&mut Promotion> {
        let code = normalize_code(code);
        self.promotions.values_mut().find(|p| p.code == code)
    }
}
