// ABOUTME: Health check routes for load balancers and orchestration
// ABOUTME: /health reports liveness, /ready checks the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::resources::ServerResources;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        (
            StatusCode::OK,
            Json(resources.health_checker.basic_health()),
        )
            .into_response()
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let health = resources.health_checker.readiness().await;
        let status = if health.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(health)).into_response()
    }
}
