//! Products
//!
//! Catalog persistence and the point-in-time lookup that feeds order pricing.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
