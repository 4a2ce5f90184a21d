//! Cashback
//!
//! Storage for the system-wide cashback policy. Balances live on the user record.

pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::CashbackServiceError;
pub use service::*;
