// ABOUTME: Environment-based configuration for HTTP, database, auth, logging, and CORS
// ABOUTME: ServerConfig::from_env reads and validates every setting at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default bind host
const DEFAULT_HOST: &str = "127.0.0.1";
/// Database used when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/courtside.db";
/// Default pool size
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Default lifetime of tokens issued by the admin CLI
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// HS256 secrets shorter than this are rejected
const MIN_JWT_SECRET_LEN: usize = 32;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Single-line human-readable output
    Compact,
    /// Multi-field human-readable output
    #[default]
    Full,
}

impl LogFormat {
    /// Parse from string (case-insensitive), defaulting to `Full`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Full,
        }
    }
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL
    pub url: String,
    /// Maximum pooled connections (ignored for in-memory databases)
    pub max_connections: u32,
}

/// Authentication settings
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret used by the identity provider
    pub jwt_secret: String,
    /// Expected `aud` claim, if the provider sets one
    pub jwt_audience: Option<String>,
    /// Lifetime of tokens issued locally by the admin CLI
    pub token_ttl_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_audience", &self.jwt_audience)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Full,
        }
    }
}

/// CORS settings
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin, empty disables cross-origin access
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether any origin is allowed
    #[must_use]
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `AUTH_JWT_SECRET` is missing or shorter than 32 bytes
    /// - A numeric variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = env::var("AUTH_JWT_SECRET")
            .map_err(|_| AppError::config("AUTH_JWT_SECRET must be set"))?;

        let config = Self {
            host: env_or("HOST", DEFAULT_HOST),
            http_port: parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_audience: env::var("AUTH_JWT_AUDIENCE")
                    .ok()
                    .filter(|a| !a.trim().is_empty()),
                token_ttl_hours: parse_env("AUTH_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?,
            },
            logging: LoggingConfig {
                level: env_or("LOG_LEVEL", "info"),
                format: LogFormat::parse(&env_or("LOG_FORMAT", "full")),
            },
            cors: CorsConfig {
                allowed_origins: parse_list(&env_or("CORS_ALLOWED_ORIGINS", "")),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT secret is too short, the pool size is zero,
    /// or the token lifetime is not positive
    pub fn validate(&self) -> AppResult<()> {
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::config(format!(
                "AUTH_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config(
                "DATABASE_MAX_CONNECTIONS must be greater than zero",
            ));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(AppError::config(
                "AUTH_TOKEN_TTL_HOURS must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
