// ABOUTME: Team routes: scoped listing with owner filter, creation, and owner-or-admin changes
// ABOUTME: Renames and deletions require the owning coach or an administrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::context::CoachContext;
use crate::database::{CreateTeamRequest, ListTeamsFilter, UpdateTeamRequest};
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityAction, ActivityLogEntry, Team};
use crate::permissions::CoachRole;
use crate::resources::ServerResources;
use crate::routes::{coach_context, parse_id};

/// Response for listing teams
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamListResponse {
    /// Teams visible to the caller
    pub teams: Vec<Team>,
    /// Number returned
    pub total: usize,
    /// Filter the list was scoped by
    pub data_filter: Map<String, Value>,
}

/// Team routes
pub struct TeamRoutes;

impl TeamRoutes {
    /// Create all team routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/teams", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/api/teams/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn visible_team(
        resources: &ServerResources,
        ctx: &CoachContext,
        raw_id: &str,
    ) -> AppResult<Team> {
        let team_id = parse_id(raw_id, "team")?;
        resources
            .database
            .teams()
            .get(team_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Team"))
    }

    /// Handle GET /api/teams
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(filter): Query<ListTeamsFilter>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let teams = resources.database.teams().list(ctx.scope(), &filter).await?;
        let total = teams.len();
        let response = TeamListResponse {
            teams,
            total,
            data_filter: ctx.scope().filter(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/teams
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateTeamRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let org_id = match request.org_id.as_deref() {
            Some(org_id) if ctx.role() == CoachRole::SuperAdmin => org_id.to_owned(),
            _ => ctx.org_id()?.to_owned(),
        };
        ctx.require_org_access(&org_id)?;

        let team = resources
            .database
            .teams()
            .create(ctx.coach_id(), &org_id, &request.name)
            .await?;

        Self::log(
            &resources,
            &ctx,
            ActivityAction::TeamCreated,
            &team,
            json!({ "name": team.name }),
        )
        .await;
        Ok((StatusCode::CREATED, Json(team)).into_response())
    }

    /// Handle GET /api/teams/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(team_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let team = Self::visible_team(&resources, &ctx, &team_id).await?;
        Ok((StatusCode::OK, Json(team)).into_response())
    }

    /// Handle PUT /api/teams/:id (team owner or admin)
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(team_id): Path<String>,
        Json(request): Json<UpdateTeamRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let team = Self::visible_team(&resources, &ctx, &team_id).await?;
        ctx.require_team_manager(team.coach_id)?;

        if let Some(new_owner) = request.coach_id {
            let owner = resources
                .database
                .coaches()
                .get(new_owner, ctx.scope())
                .await?
                .ok_or_else(|| AppError::not_found("Coach"))?;
            if owner.org_id.as_deref() != Some(team.org_id.as_str()) {
                return Err(AppError::invalid_input(
                    "Team owner must belong to the team's organization",
                ));
            }
        }

        let updated = resources.database.teams().update(team.id, &request).await?;
        Self::log(
            &resources,
            &ctx,
            ActivityAction::TeamUpdated,
            &updated,
            json!({ "name": updated.name }),
        )
        .await;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /api/teams/:id (team owner or admin)
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(team_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let team = Self::visible_team(&resources, &ctx, &team_id).await?;
        ctx.require_team_manager(team.coach_id)?;

        if !resources.database.teams().delete(team.id).await? {
            return Err(AppError::not_found("Team"));
        }
        Self::log(
            &resources,
            &ctx,
            ActivityAction::TeamDeleted,
            &team,
            json!({ "name": team.name }),
        )
        .await;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn log(
        resources: &ServerResources,
        ctx: &CoachContext,
        action: ActivityAction,
        team: &Team,
        details: Value,
    ) {
        let entry = ActivityLogEntry::new(action)
            .with_coach(ctx.coach_id())
            .with_org(team.org_id.clone())
            .with_entity(team.id)
            .with_details(details);
        resources.database.activity_log().record_best_effort(entry).await;
    }
}
