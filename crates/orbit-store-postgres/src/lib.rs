//! PostgreSQL backend for the orbit user-sync handler.
//!
//! Holds configuration only. Every call opens a fresh connection through
//! [`sqlx`], runs one statement and closes the connection again, so nothing
//! outlives a single Lambda invocation.

mod schema;
mod store;

pub mod config;
pub mod error;

pub use config::{DatabaseConfig, TlsMode};
pub use error::{Error, Result};
pub use store::PgUserStore;
