//! Startup configuration, read from the environment once and passed down.

use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";

/// Recognized options: the store connection URL and the CORS allow-list.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub allow_origins: Vec<String>,
}

impl Config {
    /// Reads `DATABASE_URL` and `ALLOW_ORIGINS` (comma-separated). An unset
    /// or empty allow-list means any origin.
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let allow_origins = parse_allow_origins(&env::var("ALLOW_ORIGINS").unwrap_or_default());
        Self {
            database_url,
            allow_origins,
        }
    }
}

fn parse_allow_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
