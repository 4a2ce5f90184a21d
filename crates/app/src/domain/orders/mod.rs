//! Orders
//!
//! Order placement: prices a basket with the `storefront` engine, persists the order and the
//! user's new cashback balance in one transaction, then queues notifications.

pub mod data;
pub mod delivery;
pub mod errors;
pub(crate) mod notify;
pub mod records;
mod repository;
pub mod service;

pub use errors::{OrderValidationError, OrdersServiceError};
pub use service::*;
