//! # Daybook Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the Daybook web server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, signed session cookies, request identity
//! - `db`: SQLite connection pool and migrations
//! - `models`: Users, sessions and the owner-scoped record kinds
//! - `search`: Keyword search across a user's records

pub mod auth;
pub mod db;
pub mod models;
pub mod search;

/// Current version of the Daybook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
