// ABOUTME: Configuration module organization for environment-driven server settings
// ABOUTME: All settings come from environment variables; there is no config file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

/// Server configuration loaded from the environment
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig,
    DEFAULT_DATABASE_URL,
};
