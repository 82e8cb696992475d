// ABOUTME: Observation routes: per-player listing and recording, edit, archive, delete
// ABOUTME: New observations attach to the player's active plan or fail with NO_ACTIVE_PLAN
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::database::UpdateObservationRequest;
use crate::errors::AppError;
use crate::lifecycle::{CreateObservation, ObservationService};
use crate::models::Observation;
use crate::resources::ServerResources;
use crate::routes::{coach_context, parse_id, PlayerRoutes};

/// Query parameters for listing observations
#[derive(Debug, Default, Deserialize)]
pub struct ListObservationsQuery {
    /// Include archived observations
    #[serde(default)]
    pub include_archived: bool,
}

/// Response for listing observations
#[derive(Debug, Serialize, Deserialize)]
pub struct ObservationListResponse {
    /// Observations, newest first
    pub observations: Vec<Observation>,
    /// Number returned
    pub total: usize,
}

/// Observation routes
pub struct ObservationRoutes;

impl ObservationRoutes {
    /// Create all observation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/players/:id/observations",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/observations/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/observations/:id/archive", post(Self::handle_archive))
            .with_state(resources)
    }

    /// Handle GET /api/players/:id/observations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
        Query(query): Query<ListObservationsQuery>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let player = PlayerRoutes::visible_player(&resources, &ctx, &player_id).await?;
        let observations = resources
            .database
            .observations()
            .list_for_player(player.id, query.include_archived)
            .await?;
        let total = observations.len();
        Ok((
            StatusCode::OK,
            Json(ObservationListResponse {
                observations,
                total,
            }),
        )
            .into_response())
    }

    /// Handle POST /api/players/:id/observations
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(player_id): Path<String>,
        Json(request): Json<CreateObservation>,
    ) -> Result<Response, AppError> {
        let player_id = parse_id(&player_id, "player")?;
        let ctx = coach_context(&headers, &resources).await?;
        let observation = ObservationService::new(&resources.database)
            .create_observation(&ctx, player_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(observation)).into_response())
    }

    /// Handle GET /api/observations/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(observation_id): Path<String>,
    ) -> Result<Response, AppError> {
        let observation_id = parse_id(&observation_id, "observation")?;
        let ctx = coach_context(&headers, &resources).await?;
        let observation = resources
            .database
            .observations()
            .get(observation_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Observation"))?;
        Ok((StatusCode::OK, Json(observation)).into_response())
    }

    /// Handle PUT /api/observations/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(observation_id): Path<String>,
        Json(request): Json<UpdateObservationRequest>,
    ) -> Result<Response, AppError> {
        let observation_id = parse_id(&observation_id, "observation")?;
        let ctx = coach_context(&headers, &resources).await?;
        let observation = ObservationService::new(&resources.database)
            .update_observation(&ctx, observation_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(observation)).into_response())
    }

    /// Handle POST /api/observations/:id/archive
    async fn handle_archive(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(observation_id): Path<String>,
    ) -> Result<Response, AppError> {
        let observation_id = parse_id(&observation_id, "observation")?;
        let ctx = coach_context(&headers, &resources).await?;
        let observation = ObservationService::new(&resources.database)
            .archive_observation(&ctx, observation_id)
            .await?;
        Ok((StatusCode::OK, Json(observation)).into_response())
    }

    /// Handle DELETE /api/observations/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(observation_id): Path<String>,
    ) -> Result<Response, AppError> {
        let observation_id = parse_id(&observation_id, "observation")?;
        let ctx = coach_context(&headers, &resources).await?;
        ObservationService::new(&resources.database)
            .delete_observation(&ctx, observation_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
