// ABOUTME: Route handlers for coach profiles and coach administration
// ABOUTME: Self-service profile edits plus admin-only role flag changes and removal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Coaches routes
//!
//! Any coach may read the coaches in their scope and edit their own names.
//! Changing role flags needs admin; granting superadmin or moving a coach to
//! another organization needs superadmin.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::context::CoachContext;
use crate::database::{CoachFlagsUpdate, UpdateCoachRequest};
use crate::errors::AppError;
use crate::models::{ActivityAction, ActivityLogEntry, Coach};
use crate::permissions::CoachRole;
use crate::resources::ServerResources;
use crate::routes::{coach_context, parse_id};

/// The signed-in coach with their resolved access
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// Coach record
    pub coach: Coach,
    /// Effective role
    pub role: CoachRole,
    /// Query filter applied to reads
    pub data_filter: Map<String, Value>,
}

/// Response for listing coaches
#[derive(Debug, Serialize, Deserialize)]
pub struct CoachListResponse {
    /// Coaches visible to the caller
    pub coaches: Vec<Coach>,
    /// Number returned
    pub total: usize,
}

/// Coach routes
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create all coach routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/coaches", get(Self::handle_list))
            .route(
                "/api/coaches/me",
                get(Self::handle_me).put(Self::handle_update_me),
            )
            .route(
                "/api/coaches/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .route("/api/coaches/:id/flags", put(Self::handle_update_flags))
            .with_state(resources)
    }

    fn me_response(ctx: CoachContext) -> MeResponse {
        MeResponse {
            role: ctx.role(),
            data_filter: ctx.scope().filter(),
            coach: ctx.coach,
        }
    }

    /// Handle GET /api/coaches
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let coaches = resources.database.coaches().list(ctx.scope()).await?;
        let total = coaches.len();
        Ok((StatusCode::OK, Json(CoachListResponse { coaches, total })).into_response())
    }

    /// Handle GET /api/coaches/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        Ok((StatusCode::OK, Json(Self::me_response(ctx))).into_response())
    }

    /// Handle PUT /api/coaches/me - edit own profile
    async fn handle_update_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateCoachRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let coach = resources
            .database
            .coaches()
            .update_profile(ctx.coach_id(), &request)
            .await?;
        Ok((StatusCode::OK, Json(Self::me_response(CoachContext::new(coach)))).into_response())
    }

    /// Handle GET /api/coaches/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(coach_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let coach_id = parse_id(&coach_id, "coach")?;
        let coach = resources
            .database
            .coaches()
            .get(coach_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Coach"))?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle PUT /api/coaches/:id/flags (admin or higher)
    async fn handle_update_flags(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(coach_id): Path<String>,
        Json(update): Json<CoachFlagsUpdate>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        ctx.require_admin()?;
        if update.is_superadmin.is_some() || update.org_id.is_some() {
            ctx.require_superadmin()?;
        }

        let coach_id = parse_id(&coach_id, "coach")?;
        let target = resources
            .database
            .coaches()
            .get(coach_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Coach"))?;
        ctx.require_coach_manager(&target)?;

        let coach = resources
            .database
            .coaches()
            .update_flags(target.id, &update)
            .await?;

        info!(
            actor = %ctx.coach_id(),
            coach_id = %coach.id,
            is_admin = coach.is_admin,
            is_superadmin = coach.is_superadmin,
            active = coach.active,
            "Coach flags updated"
        );
        let details = serde_json::to_value(&update)?;
        Self::log(&resources, &ctx, ActivityAction::CoachUpdated, &coach, details).await;

        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle DELETE /api/coaches/:id (admin or higher)
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(coach_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        ctx.require_admin()?;

        let coach_id = parse_id(&coach_id, "coach")?;
        if coach_id == ctx.coach_id() {
            return Err(AppError::invalid_input("Coaches cannot delete themselves"));
        }
        let target = resources
            .database
            .coaches()
            .get(coach_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Coach"))?;
        ctx.require_coach_manager(&target)?;

        if !resources.database.coaches().delete(coach_id, ctx.scope()).await? {
            return Err(AppError::not_found("Coach"));
        }

        Self::log(
            &resources,
            &ctx,
            ActivityAction::CoachDeleted,
            &target,
            json!({ "email": target.email }),
        )
        .await;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn log(
        resources: &ServerResources,
        ctx: &CoachContext,
        action: ActivityAction,
        target: &Coach,
        details: Value,
    ) {
        let mut entry = ActivityLogEntry::new(action)
            .with_coach(ctx.coach_id())
            .with_entity(target.id)
            .with_details(details);
        if let Some(org_id) = target.org_id.as_deref().or(ctx.coach.org_id.as_deref()) {
            entry = entry.with_org(org_id);
        }
        resources.database.activity_log().record_best_effort(entry).await;
    }
}
