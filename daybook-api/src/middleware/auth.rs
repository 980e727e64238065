//! Session authentication middleware
//!
//! Two layers work together:
//!
//! - [`attach_current_user`] runs on every request. It verifies the signed
//!   session cookie, loads the session and stores the outcome as a
//!   [`CurrentUser`] extension. Any failure, including a storage error,
//!   leaves the request anonymous.
//! - [`require_auth`] guards protected routes. Anonymous requests are
//!   redirected to the login page; signed-in requests get an
//!   [`AuthContext`] extension for handlers to extract.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use daybook_shared::{
    auth::context::{AuthContext, CurrentUser},
    models::session::Session,
};
use tracing::{debug, error};

use crate::app::AppState;

/// Where anonymous requests to protected routes are sent
pub const LOGIN_PATH: &str = "/auth/login";

/// Resolves the session cookie into a [`CurrentUser`] extension
pub async fn attach_current_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let current_user = resolve_current_user(&state, req.headers()).await;
    req.extensions_mut().insert(current_user);

    next.run(req).await
}

/// Redirects anonymous requests to [`LOGIN_PATH`]
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    let context = req
        .extensions()
        .get::<CurrentUser>()
        .and_then(CurrentUser::get)
        .cloned();

    match context {
        Some(context) => {
            req.extensions_mut().insert::<AuthContext>(context);
            next.run(req).await
        }
        None => Redirect::to(LOGIN_PATH).into_response(),
    }
}

async fn resolve_current_user(state: &AppState, headers: &HeaderMap) -> CurrentUser {
    let cookie_headers = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok());

    let Some(session_id) = state.cookies.read(cookie_headers) else {
        return CurrentUser::anonymous();
    };

    match Session::find_valid(&state.db, session_id).await {
        Ok(Some(session)) => CurrentUser::signed_in(AuthContext::from(session)),
        Ok(None) => {
            debug!(%session_id, "Session missing or expired");
            CurrentUser::anonymous()
        }
        Err(e) => {
            error!(error = %e, %session_id, "Failed to load session, continuing as anonymous");
            CurrentUser::anonymous()
        }
    }
}
