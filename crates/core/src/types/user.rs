//! Storefront customer accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A registered storefront user.
///
/// The aggregate fields (`products_bought_count`, `avg_spent`, ...) are
/// maintained by the storefront; the dashboard only displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub products_bought_count: i32,
    pub avg_spent: Decimal,
    pub coupons_used_count: i32,
    pub purchases_without_sale: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name as shown on the dashboard.
    #[must_use]
    pub fn name_parts(&self) -> NameParts<'_> {
        NameParts::split(&self.name)
    }
}

/// A full name split into first and last parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameParts<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> NameParts<'a> {
    /// Split on the first run of whitespace: `"Nour El Din"` becomes
    /// `("Nour", "El Din")`. Missing parts are empty.
    #[must_use]
    pub fn split(full_name: &'a str) -> Self {
        let trimmed = full_name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => Self {
                first_name: first,
                last_name: rest.trim_start(),
            },
            None => Self {
                first_name: trimmed,
                last_name: "",
            },
        }
    }

    /// `"First Last"` with no stray spaces.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_words() {
        let parts = NameParts::split("Mona Hassan");
        assert_eq!(parts.first_name, "Mona");
        assert_eq!(parts.last_name, "Hassan");
    }

    #[test]
    fn test_split_keeps_compound_last_name() {
        let parts = NameParts::split("  Nour   El Din ");
        assert_eq!(parts.first_name, "Nour");
        assert_eq!(parts.last_name, "El Din");
        assert_eq!(parts.display(), "Nour El Din");
    }

    #[test]
    fn test_split_single_and_empty() {
        assert_eq!(NameParts::split("Cher").last_name, "");
        let empty = NameParts::split("");
        assert_eq!(empty.first_name, "");
        assert_eq!(empty.display(), "");
    }
}
