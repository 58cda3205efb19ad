//! Product (catalog) repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use qamar_core::{ColorVariant, NewProduct, Product, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, title, brand, category, sub_category, description, price, \
     stock, images, colors, style_video, is_new_arrival, is_on_sale, is_top_seller, slug, \
     created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    brand: String,
    category: String,
    sub_category: String,
    description: String,
    price: Decimal,
    stock: i32,
    images: Json<Vec<String>>,
    colors: Json<Vec<ColorVariant>>,
    style_video: Option<String>,
    is_new_arrival: bool,
    is_on_sale: bool,
    is_top_seller: bool,
    slug: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.stock < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "product {} has negative stock {}",
                row.id, row.stock
            )));
        }

        Ok(Self {
            id: ProductId::new(row.id),
            details: NewProduct {
                title: row.title,
                brand: row.brand,
                category: row.category,
                sub_category: row.sub_category,
                description: row.description,
                price: row.price,
                stock: row.stock,
                images: row.images.0,
                colors: row.colors.0,
                style_video: row.style_video,
                is_new_arrival: row.is_new_arrival,
                is_on_sale: row.is_on_sale,
                is_top_seller: row.is_top_seller,
                slug: row.slug,
            },
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products ORDER BY created_at DESC, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new product under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let id = ProductId::generate();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO store.products (id, title, brand, category, sub_category, description, \
                 price, stock, images, colors, style_video, is_new_arrival, is_on_sale, \
                 is_top_seller, slug) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&product.title)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(Json(&product.images))
        .bind(Json(&product.colors))
        .bind(product.style_video.as_deref())
        .bind(product.is_new_arrival)
        .bind(product.is_on_sale)
        .bind(product.is_top_seller)
        .bind(&product.slug)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn update(
        &self,
        id: &ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE store.products SET title = $2, brand = $3, category = $4, \
                 sub_category = $5, description = $6, price = $7, stock = $8, images = $9, \
                 colors = $10, style_video = $11, is_new_arrival = $12, is_on_sale = $13, \
                 is_top_seller = $14, slug = $15 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&product.title)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(Json(&product.images))
        .bind(Json(&product.colors))
        .bind(product.style_video.as_deref())
        .bind(product.is_new_arrival)
        .bind(product.is_on_sale)
        .bind(product.is_top_seller)
        .bind(&product.slug)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM store.products WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
