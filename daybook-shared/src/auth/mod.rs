//! Authentication utilities
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`session_cookie`]: Signed cookie carrying the opaque session id
//! - [`context`]: Request identity (`CurrentUser`, `AuthContext`)
//!
//! Session records themselves are in [`crate::models::session`].
//!
//! # Example
//!
//! ```no_run
//! use daybook_shared::auth::password::{hash_password, verify_password};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("user_password")?;
//! assert!(verify_password("user_password", &hash)?);
//! # Ok(())
//! # }
//! ```

pub mod password;
pub mod session_cookie;
pub mod context;
