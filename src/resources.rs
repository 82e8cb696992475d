// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Bundles the database, token validation, health checker, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::health::HealthChecker;

/// Resources shared across requests
///
/// Created once at startup and cloned into each router as `Arc` state.
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Token validation
    pub auth_manager: AuthManager,
    /// Health probes
    pub health_checker: HealthChecker,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from an open database and configuration
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        Self {
            auth_manager: AuthManager::from_config(&config.auth),
            health_checker: HealthChecker::new(database.clone()),
            database,
            config,
        }
    }
}
