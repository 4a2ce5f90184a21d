//! Promocode Evaluator

use jiff::civil::Date;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::percent::Percent;

/// Errors raised while evaluating a promocode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromocodeError {
    /// A promocode name was supplied but no such promocode exists.
    #[error("promocode `{0}` not found")]
    NotFound(String),
}

/// A named, time-bounded discount code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promocode {
    /// Unique promocode name.
    pub name: String,

    /// Percentage taken off the running total.
    pub percent: Percent,

    /// Last day on which the promocode may be used.
    pub expires_on: Date,

    /// Whether the promocode combines with per-product discounts.
    pub stackable: bool,
}

impl Promocode {
    /// Whether the promocode can still be used on `today`.
    pub fn is_valid_on(&self, today: Date) -> bool {
        today <= self.expires_on
    }
}

/// What happened to the requested promocode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromocodeOutcome {
    /// No promocode was requested.
    NotRequested,

    /// The promocode reduced the running total.
    Applied {
        /// Promocode name.
        name: String,

        /// Percentage taken off.
        percent: Percent,
    },

    /// The promocode exists but does not stack with product discounts, so it was ignored.
    NotStackable {
        /// Promocode name.
        name: String,
    },

    /// The promocode exists but is past its expiry date, so it was ignored.
    Expired {
        /// Promocode name.
        name: String,
    },
}

impl PromocodeOutcome {
    /// Name of the promocode that was applied, if any.
    pub fn applied_name(&self) -> Option<&str> {
        match self {
            Self::Applied { name, .. } => Some(name),
            Self::NotRequested | Self::NotStackable { .. } | Self::Expired { .. } => None,
        }
    }
}

/// Returns the trimmed promocode name, treating blank names as absent.
pub fn requested_name(requested: Option<&str>) -> Option<&str> {
    requested.map(str::trim).filter(|name| !name.is_empty())
}

/// Applies a promocode to `running_total`.
///
/// `found` is the result of looking `requested` up in the promocode store.
///
/// # Errors
///
/// Returns [`PromocodeError::NotFound`] when a non-blank name was requested but `found` is
/// `None`.
pub fn apply_promocode(
    requested: Option<&str>,
    found: Option<&Promocode>,
    today: Date,
    running_total: Decimal,
) -> Result<(Decimal, PromocodeOutcome), PromocodeError> {
    let Some(name) = requested_name(requested) else {
        return Ok((running_total, PromocodeOutcome::NotRequested));
    };

    let Some(promocode) = found else {
        return Err(PromocodeError::NotFound(name.to_string()));
    };

    if !promocode.is_valid_on(today) {
        return Ok((
            running_total,
            PromocodeOutcome::Expired {
                name: promocode.name.clone(),
            },
        ));
    }

    if !promocode.stackable {
        return Ok((
            running_total,
            PromocodeOutcome::NotStackable {
                name: promocode.name.clone(),
            },
        ));
    }

    Ok((
        promocode.percent.take_off(running_total),
        PromocodeOutcome::Applied {
            name: promocode.name.clone(),
            percent: promocode.percent,
        },
    ))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn save10(stackable: bool) -> TestResult<Promocode> {
        Ok(Promocode {
            name: "SAVE10".to_string(),
            percent: Percent::new(10)?,
            expires_on: date(2024, 12, 31),
            stackable,
        })
    }

    #[test]
    fn missing_name_is_a_no_op() -> TestResult {
        let (total, outcome) =
            apply_promocode(None, None, date(2024, 6, 1), Decimal::from(1600))?;

        assert_eq!(total, Decimal::from(1600));
        assert_eq!(outcome, PromocodeOutcome::NotRequested);

        Ok(())
    }

    #[test]
    fn blank_name_is_a_no_op() -> TestResult {
        let (total, outcome) =
            apply_promocode(Some("   "), None, date(2024, 6, 1), Decimal::from(1600))?;

        assert_eq!(total, Decimal::from(1600));
        assert_eq!(outcome, PromocodeOutcome::NotRequested);

        Ok(())
    }

    #[test]
    fn unknown_name_is_not_found() {
        let result = apply_promocode(Some("NOPE"), None, date(2024, 6, 1), Decimal::from(1600));

        assert_eq!(result, Err(PromocodeError::NotFound("NOPE".to_string())));
    }

    #[test]
    fn stackable_promocode_reduces_total() -> TestResult {
        let promocode = save10(true)?;

        let (total, outcome) = apply_promocode(
            Some("SAVE10"),
            Some(&promocode),
            date(2024, 6, 1),
            Decimal::from(1600),
        )?;

        assert_eq!(total, Decimal::from(1440));
        assert_eq!(outcome.applied_name(), Some("SAVE10"));

        Ok(())
    }

    #[test]
    fn non_stackable_promocode_is_ignored() -> TestResult {
        let promocode = save10(false)?;

        let (total, outcome) = apply_promocode(
            Some("SAVE10"),
            Some(&promocode),
            date(2024, 6, 1),
            Decimal::from(1600),
        )?;

        assert_eq!(total, Decimal::from(1600));
        assert_eq!(
            outcome,
            PromocodeOutcome::NotStackable {
                name: "SAVE10".to_string()
            }
        );

        Ok(())
    }

    #[test]
    fn promocode_is_valid_through_its_expiry_date() -> TestResult {
        let promocode = save10(true)?;

        let (on_expiry, _) = apply_promocode(
            Some("SAVE10"),
            Some(&promocode),
            date(2024, 12, 31),
            Decimal::from(100),
        )?;

        let (after_expiry, outcome) = apply_promocode(
            Some("SAVE10"),
            Some(&promocode),
            date(2025, 1, 1),
            Decimal::from(100),
        )?;

        assert_eq!(on_expiry, Decimal::from(90));
        assert_eq!(after_expiry, Decimal::from(100));
        assert!(matches!(outcome, PromocodeOutcome::Expired { .. }));

        Ok(())
    }
}
