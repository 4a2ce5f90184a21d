//! Test support shared by service tests.

mod context;
mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
