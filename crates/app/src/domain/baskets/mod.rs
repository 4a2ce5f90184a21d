//! Baskets

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::BasketsServiceError;
pub use service::*;
