//! Catalog products (scarves) and their staff-facing form.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::form::form_text;
use super::id::ProductId;
use super::money::{MAX_AMOUNT, fits_amount_column};

/// Errors produced while validating a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },
    #[error(
        "{field} must have at most two decimal places and not exceed {max} (got {value:?})",
        max = MAX_AMOUNT
    )]
    AmountOutOfRange { field: &'static str, value: String },
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("stock must be a whole number of units (got {0:?})")]
    InvalidStock(String),
}

/// A colour variant of a product.
///
/// Missing fields deserialize as empty strings so half-filled form rows can
/// be detected and dropped by [`ProductDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorVariant {
    pub name: String,
    pub image: String,
    pub hex: String,
}

impl ColorVariant {
    /// A variant is usable only when name, image and hex are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.image, &self.hex]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            image: self.image.trim().to_owned(),
            hex: self.hex.trim().to_owned(),
        }
    }
}

/// A validated product ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub images: Vec<String>,
    pub colors: Vec<ColorVariant>,
    pub style_video: Option<String>,
    pub is_new_arrival: bool,
    pub is_on_sale: bool,
    pub is_top_seller: bool,
    pub slug: String,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: NewProduct,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// First image, used as the cover in lists.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.details.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.details.stock > 0
    }
}

/// Raw product form values as submitted by staff.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub title: String,
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    pub description: String,
    #[serde(deserialize_with = "form_text")]
    pub price: String,
    #[serde(deserialize_with = "form_text")]
    pub stock: String,
    pub images: Vec<String>,
    pub colors: Vec<ColorVariant>,
    pub style_video: String,
    pub is_new_arrival: bool,
    pub is_on_sale: bool,
    pub is_top_seller: bool,
    pub slug: String,
}

impl ProductDraft {
    /// Validate the draft.
    ///
    /// Blank image entries and incomplete colour rows are dropped rather than
    /// rejected. A blank slug is derived from the title.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field: title, category and a positive price
    /// are required; stock must be a non-negative integer when given.
    pub fn validate(&self) -> Result<NewProduct, ProductValidationError> {
        let title = required("title", &self.title)?;
        let category = required("category", &self.category)?;

        let raw_price = self.price.trim();
        if raw_price.is_empty() {
            return Err(ProductValidationError::Missing("price"));
        }
        let price = Decimal::from_str(raw_price).map_err(|_| {
            ProductValidationError::InvalidNumber {
                field: "price",
                value: raw_price.to_owned(),
            }
        })?;
        if !fits_amount_column(price) {
            return Err(ProductValidationError::AmountOutOfRange {
                field: "price",
                value: raw_price.to_owned(),
            });
        }
        if price <= Decimal::ZERO {
            return Err(ProductValidationError::NonPositivePrice);
        }

        let raw_stock = self.stock.trim();
        let stock = if raw_stock.is_empty() {
            0
        } else {
            raw_stock
                .parse::<u32>()
                .ok()
                .and_then(|stock| i32::try_from(stock).ok())
                .ok_or_else(|| ProductValidationError::InvalidStock(raw_stock.to_owned()))?
        };

        let slug = if self.slug.trim().is_empty() {
            slugify(&title)
        } else {
            slugify(&self.slug)
        };

        let style_video = Some(self.style_video.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        Ok(NewProduct {
            brand: self.brand.trim().to_owned(),
            sub_category: self.sub_category.trim().to_owned(),
            description: self.description.trim().to_owned(),
            images: self
                .images
                .iter()
                .map(|url| url.trim())
                .filter(|url| !url.is_empty())
                .map(str::to_owned)
                .collect(),
            colors: self
                .colors
                .iter()
                .filter(|color| color.is_complete())
                .map(ColorVariant::trimmed)
                .collect(),
            title,
            category,
            price,
            stock,
            style_video,
            is_new_arrival: self.is_new_arrival,
            is_on_sale: self.is_on_sale,
            is_top_seller: self.is_top_seller,
            slug,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProductValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ProductValidationError::Missing(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Lowercase ASCII slug: runs of anything but letters and digits become a
/// single `-`, with no leading or trailing dash.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
