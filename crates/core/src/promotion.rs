//! Promotion codes.
//!
//! A promotion is looked up by its upper-cased code, checked against the
//! current time, usage counters and the cart subtotal, and then turned into a
//! [`Discount`] for the order totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PromotionId, format_price, round_money};

/// Why a promotion cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionError {
    #[error("Promotion is not active")]
    Inactive,
    #[error("Promotion has not started yet")]
    NotStarted,
    #[error("Promotion has expired")]
    Expired,
    #[error("Promotion usage limit reached")]
    UsageLimitReached,
    #[error("Promotion already used the maximum number of times by this customer")]
    CustomerLimitReached,
    #[error("Minimum purchase of {} required", format_price(*.0))]
    MinimumNotMet(Decimal),
    #[error("Invalid promotion: {0}")]
    Invalid(String),
}

/// How a promotion reduces the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// `value` percent off the subtotal.
    Percentage,
    /// `value` off the subtotal, never more than the subtotal.
    FixedAmount,
    /// Shipping is waived; `value` is ignored.
    FreeShipping,
}

/// The effect of a promotion on one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Discount {
    pub amount: Decimal,
    pub free_shipping: bool,
}

impl Discount {
    pub const NONE: Self = Self {
        amount: Decimal::ZERO,
        free_shipping: false,
    };
}

/// Canonical form of a promotion code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Admin input for creating or replacing a promotion.
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionInput {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    #[serde(default)]
    pub value: Decimal,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default = "default_uses_per_customer")]
    pub max_uses_per_customer: u32,
    #[serde(default)]
    pub min_purchase: Decimal,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

const fn default_uses_per_customer() -> u32 {
    1
}

impl PromotionInput {
    fn validate(&self) -> Result<(), PromotionError> {
        if self.name.trim().is_empty() {
            return Err(PromotionError::Invalid("name cannot be empty".to_string()));
        }
        if normalize_code(&self.code).is_empty() {
            return Err(PromotionError::Invalid("code cannot be empty".to_string()));
        }
        if self.value.is_sign_negative() || self.min_purchase.is_sign_negative() {
            return Err(PromotionError::Invalid(
                "amounts cannot be negative".to_string(),
            ));
        }
        if self.kind == PromotionKind::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(PromotionError::Invalid(
                "percentage cannot exceed 100".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err(PromotionError::Invalid(
                "end_date is before start_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// A promotion code and its usage rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    pub value: Decimal,
    pub max_uses: Option<u32>,
    pub max_uses_per_customer: u32,
    pub min_purchase: Decimal,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub current_uses: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Promotion {
    /// Create a promotion from admin input. The code is upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::Invalid`] for inconsistent input.
    pub fn create(
        id: PromotionId,
        input: PromotionInput,
        now: DateTime<Utc>,
    ) -> Result<Self, PromotionError> {
        input.validate()?;
        Ok(Self {
            id,
            name: input.name,
            code: normalize_code(&input.code),
            description: input.description,
            kind: input.kind,
            value: input.value,
            max_uses: input.max_uses,
            max_uses_per_customer: input.max_uses_per_customer,
            min_purchase: input.min_purchase,
            start_date: input.start_date,
            end_date: input.end_date,
            current_uses: 0,
            is_active: true,
            created_at: now,
            updated_at: None,
        })
    }

    /// Replace the editable fields. Usage counters and activity are kept.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::Invalid`] for inconsistent input; the
    /// promotion is unchanged in that case.
    pub fn replace(&mut self, input: PromotionInput, now: DateTime<Utc>) -> Result<(), PromotionError> {
        input.validate()?;
        self.name = input.name;
        self.code = normalize_code(&input.code);
        self.description = input.description;
        self.kind = input.kind;
        self.value = input.value;
        self.max_uses = input.max_uses;
        self.max_uses_per_customer = input.max_uses_per_customer;
        self.min_purchase = input.min_purchase;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.updated_at = Some(now);
        Ok(())
    }

    /// Active and inside its date window.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| end >= now)
    }

    /// Whether anyone could redeem the code right now.
    ///
    /// # Errors
    ///
    /// Returns the first rule that blocks redemption.
    pub fn check_available(&self, now: DateTime<Utc>) -> Result<(), PromotionError> {
        if !self.is_active {
            return Err(PromotionError::Inactive);
        }
        if self.start_date.is_some_and(|start| start > now) {
            return Err(PromotionError::NotStarted);
        }
        if self.end_date.is_some_and(|end| end < now) {
            return Err(PromotionError::Expired);
        }
        if self.max_uses.is_some_and(|max| self.current_uses >= max) {
            return Err(PromotionError::UsageLimitReached);
        }
        Ok(())
    }

    /// Whether this customer can redeem the code against `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns the first rule that blocks redemption.
    pub fn check(
        &self,
        now: DateTime<Utc>,
        subtotal: Decimal,
        uses_by_customer: u32,
    ) -> Result<(), PromotionError> {
        self.check_available(now)?;
        if uses_by_customer >= self.max_uses_per_customer {
            return Err(PromotionError::CustomerLimitReached);
        }
        if subtotal < self.min_purchase {
            return Err(PromotionError::MinimumNotMet(self.min_purchase));
        }
        Ok(())
    }

    /// The discount this promotion gives on `subtotal`.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Discount {
        match self.kind {
            PromotionKind::Percentage => Discount {
                amount: round_money(subtotal * self.value / Decimal::ONE_HUNDRED).min(subtotal),
                free_shipping: false,
            },
            PromotionKind::FixedAmount => Discount {
                amount: self.value.min(subtotal),
                free_shipping: false,
            },
            PromotionKind::FreeShipping => Discount {
                amount: Decimal::ZERO,
                free_shipping: true,
            },
        }
    }

    /// Count one redemption.
    pub const fn record_use(&mut self) {
        self.current_uses = self.current_uses.saturating_add(1);
    }
}
