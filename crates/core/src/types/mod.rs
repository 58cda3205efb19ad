//! Core types for Qamar.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod email;
mod form;
pub mod id;
pub mod money;
pub mod order;
pub mod product;
pub mod promo;
pub mod sale;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, MAX_AMOUNT, Money, fits_amount_column};
pub use order::{LineItem, Order, OrderTotals};
pub use product::{ColorVariant, NewProduct, Product, ProductDraft, ProductValidationError};
pub use promo::{
    AppliedDiscount, DiscountType, NewPromoCode, OrderCandidate, PromoCode, PromoCodeDraft,
    PromoCodeKey, PromoRejection, PromoTerms, PromoValidationError,
};
pub use sale::{SaleBar, SalePopUp};
pub use status::*;
pub use user::{NameParts, User};
