//! Shared integration-test infrastructure.

mod context;
mod db;

pub use context::TestContext;
pub use db::TestDb;
