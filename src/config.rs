//! Server configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CARBONICO_PORT` | `8000` |
//! | `CARBONICO_DATABASE_URL` | `sqlite:carbonico.db?mode=rwc` |
//! | `CARBONICO_ALLOWED_ORIGINS` | `http://localhost:3000,http://frontend:3000` |
//!
//! Values that fail to parse fall back to their defaults.

use std::env;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 8000;

/// Default database path if not specified via environment variable.
pub const DEFAULT_DB_URL: &str = "sqlite:carbonico.db?mode=rwc";

/// Frontend origins allowed by CORS when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://frontend:3000"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DB_URL.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(String::from).to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("CARBONICO_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let database_url = lookup("CARBONICO_DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.database_url);

        let allowed_origins = lookup("CARBONICO_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            port,
            database_url,
            allowed_origins,
        }
    }
}
