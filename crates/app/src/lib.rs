//! Storefront application: persistence, domain services and notification delivery around the
//! pricing engine.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;
pub mod observability;

#[cfg(test)]
mod test;

pub mod uuids;
