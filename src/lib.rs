// ABOUTME: Main library entry point for the Courtside coaching API
// ABOUTME: Player development plans, observations, and role-scoped roster access over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

#![deny(unsafe_code)]

//! # Courtside Server
//!
//! Backend for a youth sports coaching dashboard. Coaches belong to an
//! organization, own teams, and track each player's Player Development Plan
//! (PDP) along with dated observations recorded against it.
//!
//! ## Architecture
//!
//! - **Permissions**: Role resolution and the data filter applied to every query
//! - **Database**: `SQLite` managers, one per entity, behind a shared pool
//! - **Lifecycle**: Plan archive-and-replace and observation recording rules
//! - **Routes**: Axum routers per domain, authenticated with JWT bearer tokens or cookies
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use courtside_server::config::ServerConfig;
//! use courtside_server::database::Database;
//! use courtside_server::errors::AppResult;
//! use courtside_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let database = Database::new(&config.database.url, config.database.max_connections).await?;
//!     let resources = Arc::new(ServerResources::new(database, config));
//!     courtside_server::server::serve(resources).await
//! }
//! ```

/// Token validation and request credential extraction
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Per-request coach context and permission guards
pub mod context;

/// `SQLite` persistence layer
pub mod database;

/// Unified error handling
pub mod errors;

/// Liveness and readiness checks
pub mod health;

/// Plan and observation workflows
pub mod lifecycle;

/// Tracing subscriber setup
pub mod logging;

/// Role resolution and data scoping
pub mod permissions;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Domain models shared with other crates
pub use courtside_core::models;
