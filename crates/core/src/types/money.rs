//! Monetary amounts with a display currency.
//!
//! The storefront sells in a single currency; amounts are shown with the
//! currency code as a suffix (`120 EGP`), which is how staff read them.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Largest amount a stored money column (`NUMERIC(12, 2)`) holds: `9999999999.99`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Whether `amount` can be stored as is: at most two decimal places and no
/// larger than [`MAX_AMOUNT`] in magnitude.
#[must_use]
pub fn fits_amount_column(amount: Decimal) -> bool {
    amount.normalize().scale() <= 2 && amount.abs() <= MAX_AMOUNT
}

/// Deserialize an amount in `0..=MAX_AMOUNT` with at most two decimal places.
pub(crate) fn bounded_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
    if amount < Decimal::ZERO || !fits_amount_column(amount) {
        return Err(de::Error::custom(format!(
            "amount must be between 0 and {MAX_AMOUNT} with at most two decimal places (got {amount})"
        )));
    }
    Ok(amount)
}

/// An amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Render with exactly two decimal places (`120.00 EGP`), as list views do.
    #[must_use]
    pub fn display_fixed(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }
}

impl fmt::Display for Money {
    /// Render the amount without trailing zeros (`120 EGP`, `99.5 EGP`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.normalize(), self.currency)
    }
}

/// ISO 4217 currency codes the storefront can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EGP,
    USD,
    EUR,
    SAR,
    AED,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::SAR => "SAR",
            Self::AED => "AED",
        }
    }

    /// Wrap an amount in this currency.
    #[must_use]
    pub const fn amount(self, amount: Decimal) -> Money {
        Money::new(amount, self)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EGP" => Ok(Self::EGP),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "SAR" => Ok(Self::SAR),
            "AED" => Ok(Self::AED),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}
