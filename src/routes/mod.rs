// ABOUTME: Route module organization for the Courtside HTTP API
// ABOUTME: One router per domain plus the shared request authentication helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! HTTP routes
//!
//! Each domain module owns its paths and thin handlers that delegate to the
//! database managers and lifecycle workflows. Every authenticated handler
//! starts by resolving a [`CoachContext`] for the request; nothing about the
//! signed-in coach or the selected player survives between requests.

/// Recent activity feed
pub mod activity;
/// Coach profile and administration routes
pub mod coaches;
/// Liveness and readiness probes
pub mod health;
/// Observation routes
pub mod observations;
/// Organization routes
pub mod organizations;
/// Development plan routes
pub mod pdps;
/// Player roster and detail routes
pub mod players;
/// Session and onboarding routes
pub mod session;
/// Team routes
pub mod teams;

pub use activity::ActivityRoutes;
pub use coaches::CoachRoutes;
pub use health::HealthRoutes;
pub use observations::ObservationRoutes;
pub use organizations::OrganizationRoutes;
pub use pdps::PdpRoutes;
pub use players::PlayerRoutes;
pub use session::SessionRoutes;
pub use teams::TeamRoutes;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::context::CoachContext;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Authenticate the request and load the signed-in coach
///
/// # Errors
///
/// Returns `AuthRequired` without credentials, `AuthInvalid`/`AuthExpired`
/// for bad tokens, and the errors of [`CoachContext::resolve`]
pub async fn coach_context(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<CoachContext> {
    let auth = resources
        .auth_manager
        .authenticate_headers(headers)?
        .ok_or_else(AppError::auth_required)?;
    CoachContext::resolve(&resources.database, &auth.auth_uid).await
}

/// Parse a path identifier
///
/// # Errors
///
/// Returns `InvalidInput` if the value is not a UUID
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid {what} ID: {raw}")))
}
