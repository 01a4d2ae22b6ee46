//! Core types, the store trait, and tenant-scoped operations for Congrega.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; backends implement
//! [`store::CommunityStore`] and callers reach every tenant operation
//! through a [`tenant::Tenant`] view. The shared roles and permissions
//! catalog is reached through [`access::Catalog`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod attendance;
pub mod cell;
pub mod error;
pub mod event;
pub mod ministry;
pub mod person;
pub mod roster;
pub mod store;
pub mod tenant;

mod patch;

pub use access::Catalog;
pub use error::{Error, Result};
pub use tenant::{CompanyId, Tenant};

#[cfg(test)]
mod testing;
