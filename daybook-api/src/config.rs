//! Configuration management for the web server
//!
//! Settings are read from the process environment (after loading `.env` if
//! present) and layered over built-in defaults with the `config` crate.
//!
//! # Environment Variables
//!
//! - `HOST`: Host to bind to (default: 0.0.0.0)
//! - `PORT`: Port to bind to (default: 3000)
//! - `DATABASE_URL`: SQLite URL (default: sqlite://daybook.db)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `SESSION_SECRET`: Cookie signing secret, at least 32 characters
//! - `COOKIE_SECURE`: Mark the session cookie `Secure` (default: false)
//! - `PRODUCTION`: Enable HSTS (default: false)
//! - `RUST_LOG`: Log filter (default: see `main.rs`)
//!
//! # Example
//!
//! ```no_run
//! use daybook_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use config::{Environment, Map};
use daybook_shared::auth::session_cookie::MIN_SECRET_LEN;
use serde::{Deserialize, Serialize};

/// Secret used when `SESSION_SECRET` is unset; only suitable for development
pub const DEV_SESSION_SECRET: &str = "dev-secret-session-change-me-please-000";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session cookie configuration
    pub session: SessionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session cookie configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret the cookie signing key is derived from
    ///
    /// Must be at least 32 characters. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Whether the cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Flat view of the environment, one field per variable
#[derive(Debug, Deserialize)]
struct EnvSettings {
    host: String,
    port: u16,
    database_url: String,
    database_max_connections: u32,
    session_secret: String,
    cookie_secure: bool,
    production: bool,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A variable has a value of the wrong type (e.g. a non-numeric `PORT`)
    /// - `SESSION_SECRET` is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_source(Environment::default().try_parsing(true))
    }

    /// Loads configuration from an explicit set of variables
    ///
    /// Keys use the environment variable names (`PORT`, `SESSION_SECRET`...).
    pub fn from_vars<I, K, V>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::from_source(Environment::default().try_parsing(true).source(Some(map)))
    }

    fn from_source(env: Environment) -> anyhow::Result<Self> {
        let settings: EnvSettings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database_url", "sqlite://daybook.db")?
            .set_default("database_max_connections", 10)?
            .set_default("session_secret", DEV_SESSION_SECRET)?
            .set_default("cookie_secure", false)?
            .set_default("production", false)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if settings.session_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {MIN_SECRET_LEN} characters long");
        }

        Ok(Self {
            server: ServerConfig {
                host: settings.host,
                port: settings.port,
                production: settings.production,
            },
            database: DatabaseConfig {
                url: settings.database_url,
                max_connections: settings.database_max_connections,
            },
            session: SessionConfig {
                secret: settings.session_secret,
                cookie_secure: settings.cookie_secure,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the built-in development secret is in use
    pub fn uses_dev_secret(&self) -> bool {
        self.session.secret == DEV_SESSION_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(std::iter::empty::<(String, String)>()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database.url, "sqlite://daybook.db");
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.session.cookie_secure);
        assert!(!config.server.production);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars([
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("SESSION_SECRET", "a-production-secret-that-is-long-enough"),
            ("COOKIE_SECURE", "true"),
            ("PRODUCTION", "true"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 2);
        assert!(config.session.cookie_secure);
        assert!(config.server.production);
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = Config::from_vars([("SESSION_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Config::from_vars([("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = Config::from_vars([("SESSION_SECRET", "a-production-secret-that-is-long-enough")])
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("a-production-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
