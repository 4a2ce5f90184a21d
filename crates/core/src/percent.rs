//! Percentages

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when constructing a [`Percent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentError {
    /// The value lies outside `0..=100`.
    #[error("percentage {0} is outside 0..=100")]
    OutOfRange(i64),
}

/// A whole-number percentage between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u8);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a percentage, rejecting values above 100.
    ///
    /// # Errors
    ///
    /// Returns [`PercentError::OutOfRange`] when `value > 100`.
    pub fn new(value: u8) -> Result<Self, PercentError> {
        if value > 100 {
            return Err(PercentError::OutOfRange(i64::from(value)));
        }

        Ok(Self(value))
    }

    /// The raw percentage value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Applies this percentage as a reduction: `amount * (100 - p) / 100`.
    pub fn take_off(self, amount: Decimal) -> Decimal {
        amount / Decimal::ONE_HUNDRED * Decimal::from(100 - self.0)
    }
}

impl TryFrom<i64> for Percent {
    type Error = PercentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|value| *value <= 100)
            .map(Self)
            .ok_or(PercentError::OutOfRange(value))
    }
}

impl From<Percent> for i64 {
    fn from(value: Percent) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
