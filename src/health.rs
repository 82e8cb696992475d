// ABOUTME: Server health monitoring for liveness and readiness probes
// ABOUTME: Reports service info, uptime, and database reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Health check endpoints and monitoring utilities

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::database::Database;

/// Service name reported by health checks
pub const SERVICE_NAME: &str = "courtside-server";

/// Overall health status
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing, service may be unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// Response timestamp (seconds since epoch)
    pub timestamp: u64,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health checker for the server
pub struct HealthChecker {
    start_time: Instant,
    database: Database,
}

impl HealthChecker {
    /// Create a new health checker
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self {
            start_time: Instant::now(),
            database,
        }
    }

    /// Liveness: the process is up and serving requests
    #[must_use]
    pub fn basic_health(&self) -> HealthResponse {
        HealthResponse {
            status: HealthStatus::Healthy,
            service: self.service_info(),
            checks: Vec::new(),
            timestamp: unix_now(),
        }
    }

    /// Readiness: the database answers queries
    pub async fn readiness(&self) -> HealthResponse {
        let database = self.check_database().await;
        let status = database.status.clone();
        HealthResponse {
            status,
            service: self.service_info(),
            checks: vec![database],
            timestamp: unix_now(),
        }
    }

    async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();
        let result = self.database.ping().await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(()) => ComponentHealth {
                name: "database".into(),
                status: HealthStatus::Healthy,
                message: "Database is accessible and responsive".into(),
                duration_ms,
            },
            Err(e) => {
                error!(error = %e, "Database health check failed");
                ComponentHealth {
                    name: "database".into(),
                    status: HealthStatus::Unhealthy,
                    message: format!("Database check failed: {}", e.message),
                    duration_ms,
                }
            }
        }
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: SERVICE_NAME.into(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl HealthResponse {
    /// Whether the service should receive traffic
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    /// Compact JSON summary for logs
    #[must_use]
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "status": self.status,
            "uptime_seconds": self.service.uptime_seconds,
            "checks": self.checks.len(),
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
