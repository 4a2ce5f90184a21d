//! Storefront Domain Concerns

pub mod baskets;
pub mod cashback;
pub mod orders;
pub mod products;
pub mod promocodes;
pub mod users;
