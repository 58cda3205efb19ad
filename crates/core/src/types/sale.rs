//! Storefront sale banners.
//!
//! There are exactly two banner documents: the top bar and the pop-up.

use serde::{Deserialize, Serialize};

/// Text of the top-of-page sale bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBar {
    #[serde(default)]
    pub description: String,
}

/// Title and text of the sale pop-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePopUp {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl SaleBar {
    /// Document key in the `sale_banners` table.
    pub const KEY: &'static str = "SaleBar";
}

impl SalePopUp {
    /// Document key in the `sale_banners` table.
    pub const KEY: &'static str = "SalePopUp";
}
