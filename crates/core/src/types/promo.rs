//! Promo codes: record validation and discount evaluation.
//!
//! Staff submit promo codes as raw form values ([`PromoCodeDraft`]). Values
//! are validated here before anything reaches the store: a non-numeric
//! discount value is rejected instead of being written through.
//!
//! [`PromoCode::evaluate`] applies a code to a candidate order the same way
//! checkout does (activity, expiry, usage limit, minimum purchase,
//! first-order eligibility, percentage cap).

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::form::form_text;
use super::money::{MAX_AMOUNT, bounded_amount, fits_amount_column};

/// Errors produced while validating a [`PromoCodeDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoValidationError {
    #[error("promo code is required")]
    MissingCode,
    #[error("promo code may only contain letters, digits, '-' and '_': {0}")]
    InvalidCode(String),
    #[error("discount type must be 'percentage' or 'fixed': {0}")]
    InvalidDiscountType(String),
    #[error("discount value is required")]
    MissingDiscountValue,
    #[error("{field} must be a number (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },
    #[error(
        "{field} must have at most two decimal places and not exceed {max} (got {value:?})",
        max = MAX_AMOUNT
    )]
    AmountOutOfRange { field: &'static str, value: String },
    #[error("discount value must be greater than zero")]
    NonPositiveDiscount,
    #[error("percentage discount cannot exceed 100")]
    PercentageTooLarge,
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("usage limit must be a whole number of uses (got {0:?})")]
    InvalidUsageLimit(String),
    #[error("expiry must be a date or date-time (got {0:?})")]
    InvalidExpiry(String),
    #[error("expiry must be in the future")]
    ExpiryInPast,
}

/// Why a promo code cannot be applied to an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PromoRejection {
    #[error("promo code is not active")]
    Inactive,
    #[error("promo code expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
    #[error("promo code has reached its usage limit of {limit}")]
    UsageLimitReached { limit: i32 },
    #[error("order subtotal is below the minimum purchase of {minimum}")]
    MinimumNotMet { minimum: Decimal },
    #[error("promo code is only valid on a customer's first order")]
    FirstOrderOnly,
    #[error("order amounts are too large to total")]
    AmountOutOfRange,
}

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` percent of the subtotal.
    #[default]
    Percentage,
    /// `discount_value` off in the store currency.
    Fixed,
}

impl DiscountType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = PromoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(PromoValidationError::InvalidDiscountType(s.to_owned())),
        }
    }
}

/// A promo code, normalized to upper case. Doubles as the record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromoCodeKey(String);

impl PromoCodeKey {
    /// Parse and normalize a code (`sale10` becomes `SALE10`).
    ///
    /// # Errors
    ///
    /// Returns `MissingCode` for blank input and `InvalidCode` when the code
    /// contains anything but ASCII letters, digits, `-` or `_`.
    pub fn parse(raw: &str) -> Result<Self, PromoValidationError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(PromoValidationError::MissingCode);
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PromoValidationError::InvalidCode(code.to_owned()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromoCodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PromoCodeKey {
    type Error = PromoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PromoCodeKey> for String {
    fn from(key: PromoCodeKey) -> Self {
        key.0
    }
}

/// Everything staff can edit on a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoTerms {
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// Minimum order subtotal; `None` means no minimum.
    pub min_purchase: Option<Decimal>,
    /// Cap on percentage discounts; `None` means uncapped.
    pub max_discount: Option<Decimal>,
    /// Maximum redemptions; `None` means unlimited.
    pub usage_limit: Option<i32>,
    pub first_order_only: bool,
    pub active: bool,
    /// `None` means the code never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A validated promo code ready to be stored. `used_count` starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromoCode {
    pub code: PromoCodeKey,
    #[serde(flatten)]
    pub terms: PromoTerms,
}

/// A stored promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub code: PromoCodeKey,
    #[serde(flatten)]
    pub terms: PromoTerms,
    pub used_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Raw promo code form values as submitted by staff.
///
/// Numeric fields accept either JSON numbers or strings (a form posts
/// strings). Empty optional fields mean "no threshold/cap/limit/expiry".
/// There is no `used_count` field: new codes always start unused.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoCodeDraft {
    #[serde(deserialize_with = "form_text")]
    pub code: String,
    #[serde(deserialize_with = "form_text")]
    pub description: String,
    #[serde(deserialize_with = "form_text")]
    pub discount_type: String,
    #[serde(deserialize_with = "form_text")]
    pub discount_value: String,
    #[serde(deserialize_with = "form_text")]
    pub min_purchase: String,
    #[serde(deserialize_with = "form_text")]
    pub max_discount: String,
    #[serde(deserialize_with = "form_text")]
    pub usage_limit: String,
    pub first_order_only: bool,
    pub active: Option<bool>,
    #[serde(deserialize_with = "form_text")]
    pub expires_at: String,
}

impl PromoCodeDraft {
    /// Validate a draft for a new promo code.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found. An expiry in the past is
    /// rejected for new codes.
    pub fn validate_new(&self, now: DateTime<Utc>) -> Result<NewPromoCode, PromoValidationError> {
        let code = PromoCodeKey::parse(&self.code)?;
        let terms = self.validate_terms()?;
        if terms.expires_at.is_some_and(|expiry| expiry <= now) {
            return Err(PromoValidationError::ExpiryInPast);
        }
        Ok(NewPromoCode { code, terms })
    }

    /// Validate a draft as an edit of an existing code.
    ///
    /// The code itself is not editable (it is the identifier), and an expired
    /// code may still be edited.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate_terms(&self) -> Result<PromoTerms, PromoValidationError> {
        let discount_type = if self.discount_type.trim().is_empty() {
            DiscountType::default()
        } else {
            self.discount_type.parse()?
        };

        let discount_value = parse_decimal("discount value", &self.discount_value)?
            .ok_or(PromoValidationError::MissingDiscountValue)?;
        if discount_value <= Decimal::ZERO {
            return Err(PromoValidationError::NonPositiveDiscount);
        }
        if discount_type == DiscountType::Percentage && discount_value > Decimal::ONE_HUNDRED {
            return Err(PromoValidationError::PercentageTooLarge);
        }

        let min_purchase = parse_non_negative("minimum purchase", &self.min_purchase)?;
        let max_discount = parse_non_negative("maximum discount", &self.max_discount)?;
        let usage_limit = parse_usage_limit(&self.usage_limit)?;
        let expires_at = parse_expiry(&self.expires_at)?;

        Ok(PromoTerms {
            description: self.description.trim().to_owned(),
            discount_type,
            discount_value,
            min_purchase,
            max_discount,
            usage_limit,
            first_order_only: self.first_order_only,
            active: self.active.unwrap_or(true),
            expires_at,
        })
    }
}

/// The order a promo code is being applied to.
///
/// Deserialized amounts are limited to what a stored order total can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCandidate {
    #[serde(deserialize_with = "bounded_amount")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "bounded_amount")]
    pub delivery_fee: Decimal,
    /// Orders the customer placed before this one.
    #[serde(default)]
    pub previous_orders: u32,
}

/// Result of applying a promo code to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub code: PromoCodeKey,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    /// `subtotal + delivery_fee - discount`.
    pub total: Decimal,
}

impl PromoCode {
    /// Whether the code has been redeemed as often as allowed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.terms
            .usage_limit
            .is_some_and(|limit| self.used_count >= limit)
    }

    /// Whether the code has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.terms.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// Apply this code to a candidate order.
    ///
    /// # Errors
    ///
    /// Returns the first rule the order fails, checked in this order:
    /// inactive, expired, usage limit, minimum purchase, first order only.
    /// Returns `AmountOutOfRange` if the total cannot be represented.
    pub fn evaluate(
        &self,
        order: &OrderCandidate,
        now: DateTime<Utc>,
    ) -> Result<AppliedDiscount, PromoRejection> {
        let terms = &self.terms;

        if !terms.active {
            return Err(PromoRejection::Inactive);
        }
        if let Some(expired_at) = terms.expires_at.filter(|_| self.is_expired(now)) {
            return Err(PromoRejection::Expired { expired_at });
        }
        if let Some(limit) = terms.usage_limit.filter(|_| self.is_exhausted()) {
            return Err(PromoRejection::UsageLimitReached { limit });
        }
        if let Some(minimum) = terms.min_purchase.filter(|min| order.subtotal < *min) {
            return Err(PromoRejection::MinimumNotMet { minimum });
        }
        if terms.first_order_only && order.previous_orders > 0 {
            return Err(PromoRejection::FirstOrderOnly);
        }

        let discount = self.discount_for(order.subtotal);
        let total = (order.subtotal - discount)
            .checked_add(order.delivery_fee)
            .ok_or(PromoRejection::AmountOutOfRange)?;
        Ok(AppliedDiscount {
            code: self.code.clone(),
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            discount,
            total,
        })
    }

    /// Discount amount for a subtotal, ignoring eligibility rules.
    ///
    /// Never negative and never more than the subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let subtotal = subtotal.max(Decimal::ZERO);
        let raw = match self.terms.discount_type {
            DiscountType::Percentage => {
                // An overflowing product is larger than the subtotal it gets clamped to.
                let pct = (subtotal / Decimal::ONE_HUNDRED)
                    .checked_mul(self.terms.discount_value)
                    .unwrap_or(subtotal);
                self.terms.max_discount.map_or(pct, |cap| pct.min(cap))
            }
            DiscountType::Fixed => self.terms.discount_value,
        };
        raw.min(subtotal)
            .max(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

// =============================================================================
// Form value parsing
// =============================================================================

fn parse_decimal(field: &'static str, raw: &str) -> Result<Option<Decimal>, PromoValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| PromoValidationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })?;
    if !fits_amount_column(value) {
        return Err(PromoValidationError::AmountOutOfRange {
            field,
            value: raw.to_owned(),
        });
    }
    Ok(Some(value))
}

fn parse_non_negative(
    field: &'static str,
    raw: &str,
) -> Result<Option<Decimal>, PromoValidationError> {
    match parse_decimal(field, raw)? {
        Some(value) if value < Decimal::ZERO => Err(PromoValidationError::Negative(field)),
        other => Ok(other),
    }
}

fn parse_usage_limit(raw: &str) -> Result<Option<i32>, PromoValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .ok()
        .and_then(|limit| i32::try_from(limit).ok())
        .map(Some)
        .ok_or_else(|| PromoValidationError::InvalidUsageLimit(raw.to_owned()))
}

/// Parse an expiry from a `datetime-local` value, RFC 3339, or a bare date.
///
/// Local date-times carry no offset and are taken as UTC. A bare date
/// expires at the end of that day.
fn parse_expiry(raw: &str) -> Result<Option<DateTime<Utc>>, PromoValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(naive.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        return Ok(Some(date.and_time(end_of_day).and_utc()));
    }

    Err(PromoValidationError::InvalidExpiry(raw.to_owned()))
}
