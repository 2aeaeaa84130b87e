//! Non-negative currency amounts.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// A non-negative decimal currency amount with two fractional digits.
///
/// Stored as an integer count of minor units (cents) so that equality and
/// formatting are exact. Serializes as the decimal string (`"45.99"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / MINOR_UNITS_PER_MAJOR,
            self.0 % MINOR_UNITS_PER_MAJOR
        )
    }
}

impl FromStr for Price {
    type Err = DomainError;

    /// Parse a plain decimal amount: `45`, `45.9` or `45.99`.
    ///
    /// Signs, exponents, grouping separators and more than two fractional
    /// digits are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::validation(format!("invalid price '{s}'"));

        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (s, None),
        };

        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let minor_units = match minor {
            None => 0,
            Some(m) if (1..=2).contains(&m.len()) && m.bytes().all(|b| b.is_ascii_digit()) => {
                let value: u64 = m.parse().map_err(|_| invalid())?;
                if m.len() == 1 { value * 10 } else { value }
            }
            Some(_) => return Err(invalid()),
        };

        let major: u64 = major.parse().map_err(|_| invalid())?;
        major
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .and_then(|v| v.checked_add(minor_units))
            .map(Price)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Price {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}
