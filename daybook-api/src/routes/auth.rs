//! Session lifecycle endpoints
//!
//! # Endpoints
//!
//! - `GET  /auth/login` - Login page
//! - `GET  /auth/signup` - Signup page
//! - `POST /auth/signup` - Create an account and sign in
//! - `POST /auth/login` - Sign in
//! - `POST /auth/logout` - Sign out
//!
//! Forms are `application/x-www-form-urlencoded` with `email` and
//! `password` fields. A successful signup or login issues a new session,
//! sets the signed session cookie and redirects to `/`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Payload,
    middleware::auth::LOGIN_PATH,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use daybook_shared::{
    auth::{context::CurrentUser, password},
    models::{
        session::Session,
        user::{CreateUser, User},
    },
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use validator::Validate;

/// Message for a missing email or password
pub const MISSING_CREDENTIALS: &str = "Email and password required";

/// Message for any failed login, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message for signup with a registered email
pub const USER_EXISTS: &str = "User already exists";

/// Signup and login form
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password required"))]
    pub password: String,
}

/// Renders the login page
pub async fn login_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Html<String>> {
    state.render("auth/login", current_user.get(), json!({}))
}

/// Renders the signup page
pub async fn signup_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Html<String>> {
    state.render("auth/signup", current_user.get(), json!({}))
}

/// Creates an account, then signs it in
///
/// # Errors
///
/// - `400 Bad Request`: "Email and password required" or "User already exists"
/// - `500 Internal Server Error`: storage or hashing failure
pub async fn signup(
    State(state): State<AppState>,
    Payload(form): Payload<CredentialsForm>,
) -> ApiResult<Response> {
    form.validate()?;

    if User::find_by_email(&state.db, &form.email).await?.is_some() {
        return Err(ApiError::BadRequest(USER_EXISTS.to_string()));
    }

    let password_hash = password::hash_password(&form.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: form.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent signup for the same email
        let duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        if duplicate {
            ApiError::BadRequest(USER_EXISTS.to_string())
        } else {
            ApiError::from(e)
        }
    })?;

    info!(user_id = user.id, "User signed up");

    start_session(&state, user.id).await
}

/// Signs in with email and password
///
/// Unknown email and wrong password produce the same response.
///
/// # Errors
///
/// - `400 Bad Request`: "Email and password required" or "Invalid credentials"
/// - `500 Internal Server Error`: storage failure or malformed stored hash
pub async fn login(
    State(state): State<AppState>,
    Payload(form): Payload<CredentialsForm>,
) -> ApiResult<Response> {
    form.validate()?;

    let Some(user) = User::find_by_email(&state.db, &form.email).await? else {
        // Same hashing cost as a wrong password
        password::verify_dummy(&form.password);
        debug!("Login attempt for unknown email");
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&form.password, &user.password_hash)? {
        debug!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = user.id, "User logged in");

    start_session(&state, user.id).await
}

/// Ends the current session
///
/// The session row is deleted if the cookie names one; deletion failures are
/// logged and ignored. The cookie is always cleared.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_headers = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok());

    if let Some(session_id) = state.cookies.read(cookie_headers) {
        match Session::delete(&state.db, session_id).await {
            Ok(true) => info!(%session_id, "Session revoked"),
            Ok(false) => debug!(%session_id, "Session already gone at logout"),
            Err(e) => warn!(error = %e, %session_id, "Failed to delete session at logout"),
        }
    }

    (
        [(header::SET_COOKIE, state.cookies.clear())],
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}

async fn start_session(state: &AppState, user_id: i64) -> ApiResult<Response> {
    let session = Session::create(&state.db, user_id).await?;

    Ok((
        [(header::SET_COOKIE, state.cookies.issue(session.id))],
        Redirect::to("/"),
    )
        .into_response())
}
