//! SQLite backend for the Congrega community store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-statement writes (attendance
//! toggles, cell member replacement) run inside `BEGIN IMMEDIATE`
//! transactions.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
