// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use courtside_server::{
    config::{LogFormat, ServerConfig},
    errors::ErrorCode,
};
use serial_test::serial;

const VARS: &[&str] = &[
    "AUTH_JWT_SECRET",
    "AUTH_JWT_AUDIENCE",
    "AUTH_TOKEN_TTL_HOURS",
    "HOST",
    "HTTP_PORT",
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "CORS_ALLOWED_ORIGINS",
];

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_with_only_secret() {
    clear_env();
    env::set_var("AUTH_JWT_SECRET", SECRET);

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.database.url, "sqlite:./data/courtside.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.auth.jwt_audience, None);
    assert_eq!(config.auth.token_ttl_hours, 24);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Full);
    assert!(config.cors.allowed_origins.is_empty());
    assert_eq!(config.bind_address(), "127.0.0.1:8081");

    clear_env();
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    env::set_var("AUTH_JWT_SECRET", SECRET);
    env::set_var("AUTH_JWT_AUDIENCE", "authenticated");
    env::set_var("HOST", "0.0.0.0");
    env::set_var("HTTP_PORT", "9000");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("LOG_FORMAT", "json");
    env::set_var(
        "CORS_ALLOWED_ORIGINS",
        "https://app.example.org, http://localhost:5173",
    );

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:9000");
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.auth.jwt_audience.as_deref(), Some("authenticated"));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://app.example.org", "http://localhost:5173"]
    );
    assert!(!config.cors.allows_any());

    clear_env();
}

#[test]
#[serial]
fn test_missing_secret_is_config_error() {
    clear_env();
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_short_secret_rejected() {
    clear_env();
    env::set_var("AUTH_JWT_SECRET", "too-short");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    clear_env();
}

#[test]
#[serial]
fn test_unparseable_port_rejected() {
    clear_env();
    env::set_var("AUTH_JWT_SECRET", SECRET);
    env::set_var("HTTP_PORT", "eighty");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    clear_env();
}

#[test]
#[serial]
fn test_debug_redacts_secret() {
    clear_env();
    env::set_var("AUTH_JWT_SECRET", SECRET);
    let config = ServerConfig::from_env().unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains(SECRET));
    assert!(rendered.contains("REDACTED"));
    clear_env();
}

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("json"), LogFormat::Json);
    assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Full);
}
