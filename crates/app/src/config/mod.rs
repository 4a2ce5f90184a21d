//! Configuration
//!
//! Settings shared by every entry point, parsed with `clap` from flags or the environment.

pub mod db;
pub mod logging;
pub mod notifications;

pub use db::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use notifications::NotificationConfig;
