//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use daybook_api::{app::{build_router, AppState}, config::Config};
//! use daybook_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(DatabaseConfig {
//!     url: config.database.url.clone(),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let state = AppState::new(pool, config)?;
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    middleware::{
        auth::{attach_current_user, require_auth},
        security::SecurityHeadersLayer,
    },
    views::{render_view, ShellRenderer, ViewRenderer},
};
use axum::{
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use daybook_shared::auth::{
    context::AuthContext,
    session_cookie::{CookieKeyError, SessionCookies},
};
use sqlx::SqlitePool;
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Session cookie signer
    pub cookies: SessionCookies,

    /// Page renderer
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    /// Creates application state with the built-in [`ShellRenderer`]
    pub fn new(db: SqlitePool, config: Config) -> Result<Self, CookieKeyError> {
        Self::with_renderer(db, config, Arc::new(ShellRenderer))
    }

    /// Creates application state with a custom renderer
    pub fn with_renderer(
        db: SqlitePool,
        config: Config,
        views: Arc<dyn ViewRenderer>,
    ) -> Result<Self, CookieKeyError> {
        let cookies = SessionCookies::new(&config.session.secret, config.session.cookie_secure)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            cookies,
            views,
        })
    }

    /// Renders `template` with `data`, adding the current user
    pub fn render(
        &self,
        template: &str,
        user: Option<&AuthContext>,
        data: serde_json::Value,
    ) -> ApiResult<Html<String>> {
        Ok(render_view(self.views.as_ref(), template, user, data)?)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health              # Health check (public)
/// ├── /auth/                    # Session lifecycle (public)
/// │   ├── GET|POST /login
/// │   ├── GET|POST /signup
/// │   └── POST     /logout
/// ├── GET  /                    # Dashboard        ┐
/// ├── GET  /plan                # Planning view    │
/// ├── GET  /focus               # Focus list       │ require_auth
/// ├── /tasks/                   # Task CRUD        │
/// └── GET  /search              # Cross-kind search┘
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. Panic recovery (500)
/// 3. Request tracing (tower-http TraceLayer)
/// 4. Current user resolution (every route)
/// 5. Login gate (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, dashboard, health, search, tasks};

    let auth_routes = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/plan", get(dashboard::plan))
        .route("/focus", get(dashboard::focus))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/new", get(tasks::new_task))
        .route("/tasks/:id/edit", get(tasks::edit_task))
        .route("/tasks/:id", post(tasks::update_task))
        .route("/tasks/:id/delete", post(tasks::delete_task))
        .route("/search", get(search::search))
        .route_layer(axum::middleware::from_fn(require_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            attach_current_user,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SecurityHeadersLayer::new(state.config.server.production))
        .with_state(state)
}

/// Converts a handler panic into the generic 500 response
fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal("Handler panicked".to_string()).into_response()
}
