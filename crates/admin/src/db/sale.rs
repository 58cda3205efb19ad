//! Sale banner repository.
//!
//! `store.sale_banners` holds exactly two rows, keyed `SaleBar` and
//! `SalePopUp`. They are seeded by the migration; updates upsert so a
//! missing row is recreated rather than reported.

use sqlx::PgPool;

use qamar_core::{SaleBar, SalePopUp};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct BannerRow {
    title: String,
    description: String,
}

/// Repository for the two sale banners.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale banner repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, key: &str) -> Result<Option<BannerRow>, RepositoryError> {
        let row = sqlx::query_as::<_, BannerRow>(
            "SELECT title, description FROM store.sale_banners WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert(&self, key: &str, title: &str, description: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO store.sale_banners (key, title, description, updated_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (key) DO UPDATE \
             SET title = EXCLUDED.title, description = EXCLUDED.description, updated_at = NOW()",
        )
        .bind(key)
        .bind(title)
        .bind(description)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Current sale bar text (empty if never set).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_bar(&self) -> Result<SaleBar, RepositoryError> {
        Ok(self
            .fetch(SaleBar::KEY)
            .await?
            .map(|row| SaleBar {
                description: row.description,
            })
            .unwrap_or_default())
    }

    /// Current sale pop-up (empty if never set).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_pop_up(&self) -> Result<SalePopUp, RepositoryError> {
        Ok(self
            .fetch(SalePopUp::KEY)
            .await?
            .map(|row| SalePopUp {
                title: row.title,
                description: row.description,
            })
            .unwrap_or_default())
    }

    /// Replace the sale bar text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn update_bar(&self, bar: &SaleBar) -> Result<(), RepositoryError> {
        self.upsert(SaleBar::KEY, "", &bar.description).await
    }

    /// Replace the sale pop-up.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn update_pop_up(&self, pop_up: &SalePopUp) -> Result<(), RepositoryError> {
        self.upsert(SalePopUp::KEY, &pop_up.title, &pop_up.description)
            .await
    }
}
