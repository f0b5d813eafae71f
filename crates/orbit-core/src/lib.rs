//! Core types and trait definitions for the orbit user-sync handler.
//!
//! This crate is deliberately free of database and runtime dependencies. The
//! Postgres backend and the Lambda binary depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod event;
pub mod store;
pub mod sync;
pub mod user;

pub use error::{Error, Result};
