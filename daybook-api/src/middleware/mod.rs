//! Middleware modules for the web server
//!
//! - `auth`: Session cookie resolution and the login gate
//! - `security`: Security response headers

pub mod auth;
pub mod security;
