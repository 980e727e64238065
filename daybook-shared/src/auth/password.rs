//! Password hashing module using Argon2id
//!
//! Passwords are hashed with Argon2id at a fixed work factor and stored as
//! PHC strings, so the salt and parameters travel with the hash and
//! verification needs nothing else.
//!
//! # Parameters
//!
//! - **Memory**: 19 MiB (19456 KiB)
//! - **Iterations**: 2 passes
//! - **Parallelism**: 1 lane
//! - **Salt**: 16 random bytes from the OS RNG
//!
//! # Example
//!
//! ```
//! use daybook_shared::auth::password::{hash_password, verify_password};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("super_secret_password_123")?;
//!
//! assert!(verify_password("super_secret_password_123", &hash)?);
//! assert!(!verify_password("wrong_password", &hash)?);
//! # Ok(())
//! # }
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::OnceLock;

/// Argon2 memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19_456;

/// Argon2 iteration count
pub const TIME_COST: u32 = 2;

/// Argon2 lane count
pub const PARALLELISM: u32 = 1;

/// Plaintext behind the hash [`verify_dummy`] checks against
const DUMMY_PASSWORD: &str = "daybook-unknown-account";

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id
///
/// Returns a PHC string such as
/// `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// The comparison is constant-time. A wrong password is `Ok(false)`; only a
/// hash that cannot be parsed produces an error.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` for a malformed stored hash and
/// `PasswordError::VerifyError` if the primitive fails for another reason.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters come from the PHC string, not from `hasher()`.
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Runs a full verification against a fixed hash
///
/// Used when no account matches, so an unknown email costs the same Argon2
/// work as a wrong password. The outcome carries no meaning for the caller.
pub fn verify_dummy(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let Some(hash) = DUMMY_HASH.get_or_init(|| hash_password(DUMMY_PASSWORD).ok()) else {
        return false;
    };

    verify_password(password, hash).unwrap_or(false)
}
