// ABOUTME: Session bootstrap and onboarding routes
// ABOUTME: Tells the client where to go after sign-in and creates an organization's first team
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Session routes
//!
//! `GET /api/session` is the first call a client makes. It never fails for a
//! missing token: anonymous callers are told to log in. A valid token whose
//! identity has no coach row is a hard error ("Coach record not found").
//! Onboarding only creates a team inside the coach's organization; a coach
//! without one waits on the pending-organization page until an administrator
//! assigns them.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::context::CoachContext;
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityAction, ActivityLogEntry, Coach, Team};
use crate::permissions::CoachRole;
use crate::resources::ServerResources;
use crate::routes::coach_context;

/// Where the client should navigate next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redirect {
    /// Sign in first
    #[serde(rename = "/login")]
    Login,
    /// Signed in but not yet assigned to an organization
    #[serde(rename = "/pending-organization")]
    PendingOrganization,
    /// Create a first team
    #[serde(rename = "/onboarding")]
    Onboarding,
    /// Ready to use the dashboard
    #[serde(rename = "/dashboard")]
    Dashboard,
}

/// Response for `GET /api/session`
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Whether valid credentials were presented
    pub authenticated: bool,
    /// Next destination
    pub redirect_to: Redirect,
    /// Signed-in coach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<Coach>,
    /// Effective role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<CoachRole>,
    /// Query filter applied to the coach's reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_filter: Option<Map<String, Value>>,
}

/// Request body for `POST /api/onboarding`
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    /// Name of the first team
    pub team_name: String,
}

/// Response for `POST /api/onboarding`
#[derive(Debug, Serialize, Deserialize)]
pub struct OnboardingResponse {
    /// The team created
    pub team: Team,
    /// Next destination
    pub redirect_to: Redirect,
}

/// Session routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/session", get(Self::handle_session))
            .route("/api/onboarding", post(Self::handle_onboarding))
            .with_state(resources)
    }

    /// Decide where a coach lands after signing in
    ///
    /// # Errors
    ///
    /// Returns an error if the team count cannot be read
    pub async fn landing_for(
        resources: &ServerResources,
        ctx: &CoachContext,
    ) -> AppResult<Redirect> {
        let Some(org_id) = ctx.coach.org_id.as_deref() else {
            return Ok(if ctx.role() == CoachRole::SuperAdmin {
                Redirect::Dashboard
            } else {
                Redirect::PendingOrganization
            });
        };

        let teams = resources.database.teams().count_for_org(org_id).await?;
        Ok(if teams == 0 {
            Redirect::Onboarding
        } else {
            Redirect::Dashboard
        })
    }

    /// Handle GET /api/session
    async fn handle_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let Some(auth) = resources.auth_manager.authenticate_headers(&headers)? else {
            let response = SessionResponse {
                authenticated: false,
                redirect_to: Redirect::Login,
                coach: None,
                role: None,
                data_filter: None,
            };
            return Ok((StatusCode::OK, Json(response)).into_response());
        };

        let ctx = CoachContext::resolve(&resources.database, &auth.auth_uid).await?;
        let redirect_to = Self::landing_for(&resources, &ctx).await?;

        let response = SessionResponse {
            authenticated: true,
            redirect_to,
            role: Some(ctx.role()),
            data_filter: Some(ctx.scope().filter()),
            coach: Some(ctx.coach),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/onboarding - create the coach's first team
    async fn handle_onboarding(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<OnboardingRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let org_id = ctx.org_id()?.to_owned();

        let team = resources
            .database
            .teams()
            .create(ctx.coach_id(), &org_id, &request.team_name)
            .await?;

        info!(coach_id = %ctx.coach_id(), team_id = %team.id, "Onboarding completed");
        resources
            .database
            .activity_log()
            .record_best_effort(
                ActivityLogEntry::new(ActivityAction::TeamCreated)
                    .with_coach(ctx.coach_id())
                    .with_org(org_id)
                    .with_entity(team.id),
            )
            .await;

        let response = OnboardingResponse {
            team,
            redirect_to: Redirect::Dashboard,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }
}
