// ABOUTME: Development plan routes: history, create, edit, archive, and archive-and-replace
// ABOUTME: Conflicts from concurrent plan changes surface as retryable 409 responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::lifecycle::PdpLifecycle;
use crate::models::Pdp;
use crate::resources::ServerResources;
use crate::routes::{coach_context, parse_id, PlayerRoutes};

/// Request body carrying plan content
#[derive(Debug, Deserialize)]
pub struct PlanContentRequest {
    /// Plan text
    pub content: String,
}

/// Request body for archive-and-replace
#[derive(Debug, Deserialize)]
pub struct ReplacePlanRequest {
    /// Content of the successor plan
    pub content: String,
    /// Plan the client believes is active; the replace fails if it is not
    #[serde(default)]
    pub expected_pdp_id: Option<Uuid>,
}

/// Response for listing a player's plans
#[derive(Debug, Serialize, Deserialize)]
pub struct PdpListResponse {
    /// Active plan first, then archived plans newest first
    pub pdps: Vec<Pdp>,
    /// Number returned
    pub total: usize,
}

/// Development plan routes
pub struct PdpRoutes;

impl PdpRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/players/:id/pdps",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/players/:id/pdps/active", get(Self::handle_active))
            .route("/api/players/:id/pdps/replace", post(Self::handle_replace))
            .route(
                "/api/pdps/:id",
                get(Self::handle_get).put(Self::handle_update),
            )
            .route("/api/pdps/:id/archive", post(Self::handle_archive))
            .with_state(resources)
    }

    /// Handle GET /api/players/:id/pdps
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = PlayerRoutes::visible_player(&resources, &ctx, &player_id).await?;
        let pdps = resources.database.pdps().list_for_player(player.id).await?;
        let total = pdps.len();
        Ok((StatusCode::OK, Json(PdpListResponse { pdps, total })).into_response())
    }

    /// Handle POST /api/players/:id/pdps - start a plan
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
        Json(request): Json<PlanContentRequest>,
    ) -> Result<Response, AppError> {
        let player_id = parse_id(&player_id, "player")?;
        let ctx = coach_context(&headers, &resources).await?;
        let plan = PdpLifecycle::new(&resources.database)
            .create_plan(&ctx, player_id, &request.content)
            .await?;
        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }

    /// Handle GET /api/players/:id/pdps/active
    async fn handle_active(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
    ) -> Result<Response, AppError> {
        let player_id = parse_id(&player_id, "player")?;
        let ctx = coach_context(&headers, &resources).await?;
        let state = PdpLifecycle::new(&resources.database)
            .plan_state(&ctx, player_id)
            .await?;
        Ok((StatusCode::OK, Json(state)).into_response())
    }

    /// Handle POST /api/players/:id/pdps/replace - archive the active plan and start a new one
    async fn handle_replace(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
        Json(request): Json<ReplacePlanRequest>,
    ) -> Result<Response, AppError> {
        let player_id = parse_id(&player_id, "player")?;
        let ctx = coach_context(&headers, &resources).await?;
        let outcome = PdpLifecycle::new(&resources.database)
            .archive_and_replace(&ctx, player_id, &request.content, request.expected_pdp_id)
            .await?;
        Ok((StatusCode::CREATED, Json(outcome)).into_response())
    }

    /// Handle GET /api/pdps/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(pdp_id): Path<String>,
    ) -> Result<Response, AppError> {
        let pdp_id = parse_id(&pdp_id, "plan")?;
        let ctx = coach_context(&headers, &resources).await?;
        let plan = resources
            .database
            .pdps()
            .get(pdp_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Plan"))?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle PUT /api/pdps/:id - edit an active plan
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(pdp_id): Path<String>,
        Json(request): Json<PlanContentRequest>,
    ) -> Result<Response, AppError> {
        let pdp_id = parse_id(&pdp_id, "plan")?;
        let ctx = coach_context(&headers, &resources).await?;
        let plan = PdpLifecycle::new(&resources.database)
            .update_plan(&ctx, pdp_id, &request.content)
            .await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle POST /api/pdps/:id/archive
    async fn handle_archive(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(pdp_id): Path<String>,
    ) -> Result<Response, AppError> {
        let pdp_id = parse_id(&pdp_id, "plan")?;
        let ctx = coach_context(&headers, &resources).await?;
        let outcome = PdpLifecycle::new(&resources.database)
            .archive_plan(&ctx, pdp_id)
            .await?;
        Ok((StatusCode::OK, Json(outcome)).into_response())
    }
}
