//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{pricing::PricingError, promocodes::PromocodeError};
use thiserror::Error;

use crate::database::is_contention;

/// Problems with a placement request, caught before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("basket is empty")]
    EmptyBasket,

    #[error("a delivery reminder needs a delivery date")]
    MissingDeliveryDate,

    #[error("none of the requested products exist")]
    NoKnownProducts,
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid order")]
    Validation(#[from] OrderValidationError),

    #[error("user not found")]
    UserNotFound,

    #[error("promocode `{0}` not found")]
    PromocodeNotFound(String),

    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order conflicted with a concurrent update")]
    Conflict,

    #[error("order total overflowed")]
    Overflow,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_contention(&error) {
            return Self::Conflict;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::Promocode(PromocodeError::NotFound(name)) => {
                Self::PromocodeNotFound(name)
            }
            PricingError::Overflow => Self::Overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_promocode_keeps_its_name() {
        let error = OrdersServiceError::from(PricingError::Promocode(PromocodeError::NotFound(
            "SAVE10".to_string(),
        )));

        assert!(matches!(error, OrdersServiceError::PromocodeNotFound(name) if name == "SAVE10"));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = OrdersServiceError::from(Error::RowNotFound);

        assert!(matches!(error, OrdersServiceError::NotFound));
    }
}
