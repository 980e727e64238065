//! Common test utilities for integration tests
//!
//! - In-memory database setup with migrations applied
//! - Router construction with a fixed session secret
//! - Request helpers for form posts and cookie handling
//! - Extraction of the view data embedded by the shell renderer

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use daybook_api::{
    app::{build_router, AppState},
    config::Config,
};
use daybook_shared::auth::session_cookie::SessionCookies;
use daybook_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use sqlx::SqlitePool;
use tower::Service as _;

/// Session secret used by every test router
pub const TEST_SECRET: &str = "integration-test-session-secret-0123456789";

/// Default password for users created through [`TestContext::signup`]
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new context backed by a private in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_vars([
            ("SESSION_SECRET", TEST_SECRET),
            ("DATABASE_URL", "sqlite::memory:"),
        ])?;

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone())?;
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Cookie signer using the same key as the router
    pub fn cookies(&self) -> SessionCookies {
        SessionCookies::new(TEST_SECRET, false).expect("test secret is long enough")
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// `GET uri`, optionally with a session cookie
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// `POST uri` with a urlencoded form body, optionally with a session cookie
    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }

    /// `POST uri` with a JSON body, optionally with a session cookie
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// `POST uri` without a `Content-Type` header
    pub async fn post_untyped(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Signs up `email` with [`TEST_PASSWORD`] and returns the session cookie
    pub async fn signup(&self, email: &str) -> String {
        let response = self
            .post_form(
                "/auth/signup",
                &credentials_form(email, TEST_PASSWORD),
                None,
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "signup should redirect");
        session_cookie(&response).expect("signup should set the session cookie")
    }

    /// Creates a task through the HTTP surface
    pub async fn create_task(&self, cookie: &str, form: &str) {
        let response = self.post_form("/tasks", form, Some(cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "task creation should redirect");
    }

    /// Fetches `uri` as a signed-in user and returns the embedded view data
    pub async fn view(&self, uri: &str, cookie: &str) -> serde_json::Value {
        let response = self.get(uri, Some(cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {} should succeed", uri);
        view_data(&body_string(response).await)
    }
}

/// Urlencoded `email`/`password` form body
pub fn credentials_form(email: &str, password: &str) -> String {
    format!("email={}&password={}", encode(email), encode(password))
}

/// Minimal urlencoding for form values used in tests
pub fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('@', "%40")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace('+', "%2B")
        .replace(' ', "+")
}

/// `name=value` pair of the session cookie set by `response`, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("daybook_session="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Raw `Set-Cookie` header for the session cookie
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Redirect target of `response`
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Reads the whole response body as UTF-8
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Parses the JSON the shell renderer embeds in `<pre id="view-data">`
pub fn view_data(html: &str) -> serde_json::Value {
    let start_tag = "<pre id=\"view-data\">";
    let start = html.find(start_tag).expect("view data block") + start_tag.len();
    let end = html[start..].find("</pre>").expect("view data end") + start;

    let json = html[start..end]
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&");

    serde_json::from_str(&json).expect("view data is JSON")
}

/// Template name the shell renderer recorded for the page
pub fn template_name(html: &str) -> Option<&str> {
    let start_tag = "data-template=\"";
    let start = html.find(start_tag)? + start_tag.len();
    let end = html[start..].find('"')? + start;
    Some(&html[start..end])
}
