//! Per-request identity
//!
//! The session middleware resolves the session cookie once per request and
//! stores the outcome as a [`CurrentUser`] request extension. Protected routes
//! additionally receive an [`AuthContext`], which is the only way handlers
//! obtain an [`OwnerScope`] for data access.
//!
//! An `AuthContext` can only be built from a [`SessionWithUser`] returned by
//! a session lookup, so request input never turns directly into an identity.
//!
//! # Example
//!
//! ```
//! use daybook_shared::auth::context::CurrentUser;
//!
//! let anonymous = CurrentUser::anonymous();
//! assert!(anonymous.get().is_none());
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::models::{session::SessionWithUser, OwnerScope};

/// Identity of an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    user_id: i64,
    email: String,

    #[serde(skip_serializing)]
    session_id: Uuid,
}

impl AuthContext {
    /// Authenticated user ID
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Email of the authenticated user
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Session the request was authenticated with
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Owner scope for data access on behalf of this user
    pub fn scope(&self) -> OwnerScope {
        OwnerScope::new(self.user_id)
    }
}

impl From<SessionWithUser> for AuthContext {
    fn from(session: SessionWithUser) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
            session_id: session.id,
        }
    }
}

/// Outcome of session resolution for one request
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(Option<AuthContext>);

impl CurrentUser {
    /// No valid session was presented
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// A valid, unexpired session was presented
    pub fn signed_in(context: AuthContext) -> Self {
        Self(Some(context))
    }

    /// Resolved identity, if any
    pub fn get(&self) -> Option<&AuthContext> {
        self.0.as_ref()
    }

    /// Consumes the wrapper, returning the identity if any
    pub fn into_inner(self) -> Option<AuthContext> {
        self.0
    }
}
