use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Accepted price input: a positive amount with no leading zero and either
/// no fraction or exactly two decimal digits.
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]*(\.[0-9]{2})?$").expect("price pattern is a valid regex")
});

/// A monetary value in currency minor units (cents for EUR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(pub i64);

impl MinorUnits {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Checks `input` against the price pattern.
    pub fn is_valid_price(input: &str) -> bool {
        PRICE_PATTERN.is_match(input)
    }

    /// Parses a user-entered price ("12.50") into minor units (1250).
    ///
    /// Returns `None` when the input does not match the price pattern or
    /// does not fit into an `i64` once scaled.
    pub fn parse_price(input: &str) -> Option<Self> {
        if !Self::is_valid_price(input) {
            return None;
        }
        let amount = Decimal::from_str(input).ok()?;
        let scaled = amount.checked_mul(Decimal::ONE_HUNDRED)?.round();
        scaled.to_i64().map(Self)
    }

    /// Formats the amount in major units with two decimals ("12.50").
    pub fn to_price_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_price_string())
    }
}

/// A catalog entry as read back from the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned document id.
    pub id: String,
    pub name: String,
    pub price: MinorUnits,
}

/// The fields written when a product is created; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: MinorUnits,
}

impl NewProduct {
    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            price: self.price,
        }
    }
}
