//! Signed session cookie
//!
//! The browser only ever holds an opaque session id. The id is signed with
//! HMAC-SHA256 (via `cookie`'s signed jar) so a tampered or forged value is
//! rejected before any database lookup happens; the session itself lives in
//! the `sessions` table.
//!
//! # Example
//!
//! ```
//! use daybook_shared::auth::session_cookie::SessionCookies;
//! use uuid::Uuid;
//!
//! let cookies = SessionCookies::new("an-example-secret-that-is-long-enough!", false).unwrap();
//! let session_id = Uuid::new_v4();
//!
//! let set_cookie = cookies.issue(session_id);
//! let (pair, _attributes) = set_cookie.split_once(';').unwrap();
//!
//! assert_eq!(cookies.read([pair]), Some(session_id));
//! ```

use cookie::{time::Duration, Cookie, CookieJar, Key, SameSite};
use uuid::Uuid;

/// Name of the cookie carrying the signed session id
pub const SESSION_COOKIE_NAME: &str = "daybook_session";

/// Minimum accepted length of the signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Errors building the cookie signing key
#[derive(Debug, thiserror::Error)]
pub enum CookieKeyError {
    /// Secret is too short to derive a signing key from
    #[error("Session secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    SecretTooShort(usize),
}

/// Issues, reads and clears the signed session cookie
#[derive(Clone)]
pub struct SessionCookies {
    key: Key,
    secure: bool,
    max_age: Duration,
}

impl std::fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookies")
            .field("secure", &self.secure)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionCookies {
    /// Derives the signing key from `secret`
    ///
    /// `secure` adds the `Secure` attribute to issued cookies.
    pub fn new(secret: &str, secure: bool) -> Result<Self, CookieKeyError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(CookieKeyError::SecretTooShort(secret.len()));
        }

        Ok(Self {
            key: Key::derive_from(secret.as_bytes()),
            secure,
            max_age: Duration::days(crate::models::session::SESSION_TTL_DAYS),
        })
    }

    /// Builds the `Set-Cookie` value for a freshly issued session
    pub fn issue(&self, session_id: Uuid) -> String {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(self.max_age)
            .build();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);

        jar.get(SESSION_COOKIE_NAME)
            .map(|signed| signed.to_string())
            .unwrap_or_default()
    }

    /// Builds the `Set-Cookie` value that removes the session cookie
    pub fn clear(&self) -> String {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();
        cookie.make_removal();

        cookie.to_string()
    }

    /// Extracts the session id from `Cookie` header values
    ///
    /// Returns `None` when the cookie is absent, its signature does not
    /// verify, or the verified value is not a UUID.
    pub fn read<'a, I>(&self, cookie_headers: I) -> Option<Uuid>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut jar = CookieJar::new();
        for header in cookie_headers {
            for cookie in Cookie::split_parse(header).flatten() {
                jar.add_original(cookie.into_owned());
            }
        }

        let verified = jar.signed(&self.key).get(SESSION_COOKIE_NAME)?;
        Uuid::parse_str(verified.value()).ok()
    }
}
