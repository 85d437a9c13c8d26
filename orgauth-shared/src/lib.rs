//! # orgauth shared library
//!
//! Types and logic used by the orgauth API server.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing and session tokens
//! - `db`: connection pool and migrations
//! - `models`: users, organisations and memberships with their SQL
//! - `store`: the persistence seam handed to request handlers

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
