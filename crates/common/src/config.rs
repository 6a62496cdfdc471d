//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Identity provider and email
//! settings are owned by their crates (`AuthConfig`, `EmailConfig`).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Where server-side sessions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Postgres,
    Memory,
}

impl SessionBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(SessionBackend::Postgres),
            "memory" => Ok(SessionBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown SESSION_STORE: {}. Supported: postgres, memory",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Public base URL of this application, used for OAuth redirects
    pub app_base_url: String,

    /// Session storage
    pub session_store: SessionBackend,
    pub session_cookie_secure: bool,

    /// Runtime configuration
    pub rust_log: String,
    pub log_json: bool,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let app_base_url = env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            session_store: SessionBackend::parse(
                &env::var("SESSION_STORE").unwrap_or_else(|_| "postgres".to_string()),
            )?,
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or_else(|_| app_base_url.starts_with("https://")),
            app_base_url,

            rust_log: env::var("RUST_LOG")
                .unwrap_or_else(|_| "jobtrack=debug,tower_http=info".to_string()),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }

    /// Absolute URL the identity provider redirects back to
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.app_base_url)
    }
}
