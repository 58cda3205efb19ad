//! Seed the store with products and promo codes from a YAML catalog.
//!
//! Entries go through the same validation as the admin API. Products whose
//! slug already exists and promo codes that already exist are skipped, so
//! the command can be re-run safely.
//!
//! ```yaml
//! products:
//!   - title: Silk Square
//!     category: Silk
//!     price: "450"
//!     stock: "12"
//! promo_codes:
//!   - code: WELCOME10
//!     discountType: percentage
//!     discountValue: "10"
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use qamar_admin::db::{self, ProductRepository, PromoCodeRepository, RepositoryError};
use qamar_core::{ProductDraft, PromoCodeDraft};

/// Catalog file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub products: Vec<ProductDraft>,
    pub promo_codes: Vec<PromoCodeDraft>,
}

impl CatalogSeed {
    /// Validation errors for every invalid entry, labelled by position.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<String> {
        let now = Utc::now();
        let products = self.products.iter().enumerate().filter_map(|(i, draft)| {
            draft
                .validate()
                .err()
                .map(|e| format!("products[{i}] ({}): {e}", draft.title))
        });
        let promos = self.promo_codes.iter().enumerate().filter_map(|(i, draft)| {
            draft
                .validate_new(now)
                .err()
                .map(|e| format!("promo_codes[{i}] ({}): {e}", draft.code))
        });
        products.chain(promos).collect()
    }
}

/// Outcome counts for a seeding run.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub products_inserted: usize,
    pub products_skipped: usize,
    pub promo_codes_inserted: usize,
    pub promo_codes_skipped: usize,
}

/// Seed products and promo codes from a YAML file.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or parsed, any entry is invalid, or a database operation fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url().map_err(|var| format!("{var} not set"))?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;

    info!(
        products = seed.products.len(),
        promo_codes = seed.promo_codes.len(),
        "Parsed catalog"
    );

    let errors = seed.validation_errors();
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = insert(&pool, &seed).await?;

    info!("Seeding complete!");
    info!("  Products inserted: {}", summary.products_inserted);
    info!("  Products skipped (slug exists): {}", summary.products_skipped);
    info!("  Promo codes inserted: {}", summary.promo_codes_inserted);
    info!("  Promo codes skipped (already exist): {}", summary.promo_codes_skipped);

    Ok(())
}

async fn insert(
    pool: &sqlx::PgPool,
    seed: &CatalogSeed,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let mut summary = SeedSummary::default();
    let now = Utc::now();

    let products = ProductRepository::new(pool);
    let mut slugs: HashSet<String> = products
        .list_all()
        .await?
        .into_iter()
        .map(|p| p.details.slug)
        .collect();

    for draft in &seed.products {
        let product = draft.validate()?;
        if !slugs.insert(product.slug.clone()) {
            summary.products_skipped += 1;
            continue;
        }
        products.create(&product).await?;
        summary.products_inserted += 1;
    }

    let promos = PromoCodeRepository::new(pool);
    for draft in &seed.promo_codes {
        let promo = draft.validate_new(now)?;
        match promos.create(&promo).await {
            Ok(_) => summary.promo_codes_inserted += 1,
            Err(RepositoryError::Conflict(_)) => {
                warn!(code = %promo.code, "Promo code already exists");
                summary.promo_codes_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}
