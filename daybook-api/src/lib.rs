//! # Daybook Web Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Form-or-JSON request bodies
//! - `middleware`: Session resolution, login gate, security headers
//! - `routes`: Route handlers
//! - `views`: View rendering seam

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod views;
