//! Promocodes

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::PromocodesServiceError;
pub use service::*;
