// ABOUTME: Player routes: roster listing, CRUD, and the player detail overview
// ABOUTME: The overview carries the selected player's plan and observations for one request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Player routes
//!
//! The dashboard's "selected player" is not server state. Clients pass the
//! player id on every call and `GET /api/players/:id/overview` returns the
//! whole detail pane in one response.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::CoachContext;
use crate::database::{CreatePlayerRequest, ListPlayersFilter, UpdatePlayerRequest};
use crate::errors::{AppError, AppResult};
use crate::lifecycle::{PdpLifecycle, PlanState};
use crate::models::{ActivityAction, ActivityLogEntry, Observation, Player};
use crate::permissions::CoachRole;
use crate::resources::ServerResources;
use crate::routes::{coach_context, parse_id};

/// Response for listing players
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerListResponse {
    /// Players visible to the caller
    pub players: Vec<Player>,
    /// Number returned
    pub total: usize,
}

/// Everything the player detail pane shows
#[derive(Debug, Serialize)]
pub struct PlayerOverview {
    /// The player
    pub player: Player,
    /// Active plan, if any
    pub plan: PlanState,
    /// Observations that are not archived, newest first
    pub observations: Vec<Observation>,
    /// Number of archived plans
    pub archived_plan_count: i64,
}

/// Player routes
pub struct PlayerRoutes;

impl PlayerRoutes {
    /// Create all player routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/players",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/players/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/players/:id/overview", get(Self::handle_overview))
            .with_state(resources)
    }

    /// Load a player visible to the coach
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed id and `ResourceNotFound` when
    /// the player is absent or outside the coach's scope
    pub async fn visible_player(
        resources: &ServerResources,
        ctx: &CoachContext,
        raw_id: &str,
    ) -> AppResult<Player> {
        let player_id = parse_id(raw_id, "player")?;
        resources
            .database
            .players()
            .get(player_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Player"))
    }

    /// Handle GET /api/players
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(filter): Query<ListPlayersFilter>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let players = resources.database.players().list(ctx.scope(), &filter).await?;
        let total = players.len();
        Ok((StatusCode::OK, Json(PlayerListResponse { players, total })).into_response())
    }

    /// Handle POST /api/players
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreatePlayerRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let org_id = match request.org_id.as_deref() {
            Some(org_id) if ctx.role() == CoachRole::SuperAdmin => org_id.to_owned(),
            _ => ctx.org_id()?.to_owned(),
        };
        ctx.require_org_access(&org_id)?;

        let player = resources.database.players().create(&org_id, &request).await?;

        Self::log(&resources, &ctx, ActivityAction::PlayerCreated, &player).await;
        Ok((StatusCode::CREATED, Json(player)).into_response())
    }

    /// Handle GET /api/players/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = Self::visible_player(&resources, &ctx, &player_id).await?;
        Ok((StatusCode::OK, Json(player)).into_response())
    }

    /// Handle PUT /api/players/:id - rename or move between teams
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
        Json(request): Json<UpdatePlayerRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = Self::visible_player(&resources, &ctx, &player_id).await?;
        ctx.require_org_access(&player.org_id)?;

        let updated = resources.database.players().update(&player, &request).await?;

        Self::log(&resources, &ctx, ActivityAction::PlayerUpdated, &updated).await;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /api/players/:id - removes plans and observations too
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = Self::visible_player(&resources, &ctx, &player_id).await?;
        ctx.require_org_access(&player.org_id)?;

        if !resources.database.players().delete(player.id).await? {
            return Err(AppError::not_found("Player"));
        }

        Self::log(&resources, &ctx, ActivityAction::PlayerDeleted, &player).await;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/players/:id/overview
    async fn handle_overview(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = Self::visible_player(&resources, &ctx, &player_id).await?;

        let plan = PdpLifecycle::new(&resources.database)
            .plan_state(&ctx, player.id)
            .await?;
        let observations = resources
            .database
            .observations()
            .list_for_player(player.id, false)
            .await?;
        let archived_plan_count = resources.database.pdps().count_archived(player.id).await?;

        let overview = PlayerOverview {
            player,
            plan,
            observations,
            archived_plan_count,
        };
        Ok((StatusCode::OK, Json(overview)).into_response())
    }

    async fn log(
        resources: &ServerResources,
        ctx: &CoachContext,
        action: ActivityAction,
        player: &Player,
    ) {
        let entry = ActivityLogEntry::new(action)
            .with_coach(ctx.coach_id())
            .with_org(player.org_id.clone())
            .with_entity(player.id)
            .with_details(json!({ "name": player.name, "team_id": player.team_id }));
        resources.database.activity_log().record_best_effort(entry).await;
    }
}
