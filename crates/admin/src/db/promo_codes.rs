//! Promo code repository.
//!
//! Codes are keyed by their normalized upper-case text. `used_count` is
//! only ever set to zero on insert and incremented by
//! [`PromoCodeRepository::record_redemption`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use qamar_core::{DiscountType, NewPromoCode, PromoCode, PromoCodeKey, PromoTerms};

use super::{RepositoryError, is_unique_violation};

const PROMO_COLUMNS: &str = "code, description, discount_type, discount_value, min_purchase, \
     max_discount, usage_limit, used_count, first_order_only, active, expires_at, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct PromoCodeRow {
    code: String,
    description: String,
    discount_type: String,
    discount_value: Decimal,
    min_purchase: Option<Decimal>,
    max_discount: Option<Decimal>,
    usage_limit: Option<i32>,
    used_count: i32,
    first_order_only: bool,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PromoCodeRow> for PromoCode {
    type Error = RepositoryError;

    fn try_from(row: PromoCodeRow) -> Result<Self, Self::Error> {
        let code = PromoCodeKey::parse(&row.code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid promo code in database: {e}"))
        })?;
        let discount_type = row.discount_type.parse::<DiscountType>().map_err(|e| {
            RepositoryError::DataCorruption(format!("promo code {code}: {e}"))
        })?;

        Ok(Self {
            code,
            terms: PromoTerms {
                description: row.description,
                discount_type,
                discount_value: row.discount_value,
                min_purchase: row.min_purchase,
                max_discount: row.max_discount,
                usage_limit: row.usage_limit,
                first_order_only: row.first_order_only,
                active: row.active,
                expires_at: row.expires_at,
            },
            used_count: row.used_count,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for promo codes.
pub struct PromoCodeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoCodeRepository<'a> {
    /// Create a new promo code repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all promo codes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PromoCode>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM store.promo_codes ORDER BY created_at DESC, code"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a promo code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, code: &PromoCodeKey) -> Result<Option<PromoCode>, RepositoryError> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM store.promo_codes WHERE code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new promo code with `used_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    pub async fn create(&self, promo: &NewPromoCode) -> Result<PromoCode, RepositoryError> {
        let terms = &promo.terms;
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "INSERT INTO store.promo_codes (code, description, discount_type, discount_value, \
                 min_purchase, max_discount, usage_limit, used_count, first_order_only, active, \
                 expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10) \
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(promo.code.as_str())
        .bind(&terms.description)
        .bind(terms.discount_type.as_str())
        .bind(terms.discount_value)
        .bind(terms.min_purchase)
        .bind(terms.max_discount)
        .bind(terms.usage_limit)
        .bind(terms.first_order_only)
        .bind(terms.active)
        .bind(terms.expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("promo code {} already exists", promo.code))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Replace the editable terms of a code. `used_count` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the code does not exist.
    pub async fn update(
        &self,
        code: &PromoCodeKey,
        terms: &PromoTerms,
    ) -> Result<PromoCode, RepositoryError> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "UPDATE store.promo_codes SET description = $2, discount_type = $3, \
                 discount_value = $4, min_purchase = $5, max_discount = $6, usage_limit = $7, \
                 first_order_only = $8, active = $9, expires_at = $10 \
             WHERE code = $1 \
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(code.as_str())
        .bind(&terms.description)
        .bind(terms.discount_type.as_str())
        .bind(terms.discount_value)
        .bind(terms.min_purchase)
        .bind(terms.max_discount)
        .bind(terms.usage_limit)
        .bind(terms.first_order_only)
        .bind(terms.active)
        .bind(terms.expires_at)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a promo code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the code does not exist.
    pub async fn delete(&self, code: &PromoCodeKey) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM store.promo_codes WHERE code = $1")
            .bind(code.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all promo codes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.promo_codes")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// The most recently created promo code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self) -> Result<Option<PromoCode>, RepositoryError> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM store.promo_codes ORDER BY created_at DESC LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count one redemption.
    ///
    /// The increment is a single conditional `UPDATE`, so concurrent
    /// redemptions can never push `used_count` past `usage_limit`.
    /// Returns `false` when the code is already exhausted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the code does not exist.
    pub async fn record_redemption(&self, code: &PromoCodeKey) -> Result<bool, RepositoryError> {
        let updated: Option<i32> = sqlx::query_scalar(
            "UPDATE store.promo_codes SET used_count = used_count + 1 \
             WHERE code = $1 AND (usage_limit IS NULL OR used_count < usage_limit) \
             RETURNING used_count",
        )
        .bind(code.as_str())
        .fetch_optional(self.pool)
        .await?;

        if updated.is_some() {
            return Ok(true);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM store.promo_codes WHERE code = $1)")
                .bind(code.as_str())
                .fetch_one(self.pool)
                .await?;

        if exists {
            Ok(false)
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}
