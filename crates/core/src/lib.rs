//! Storefront
//!
//! Storefront prices shop orders: per-product discounts, promocodes and a cashback loyalty
//! ledger, combined into a single charged amount.

pub mod basket;
pub mod cashback;
pub mod catalog;
pub mod discounts;
pub mod percent;
pub mod pricing;
pub mod promocodes;
