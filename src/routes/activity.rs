// ABOUTME: Recent activity feed for administrators, scoped to their organization
// ABOUTME: Superadmins see every organization; the entry count is clamped per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ActivityLogEntry;
use crate::resources::ServerResources;
use crate::routes::coach_context;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

/// Query parameters for the activity feed
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    /// Maximum entries to return
    pub limit: Option<u32>,
}

/// Response for the activity feed
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// Entries, newest first
    pub entries: Vec<ActivityLogEntry>,
}

/// Activity feed routes
pub struct ActivityRoutes;

impl ActivityRoutes {
    /// Create all activity routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/activity", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle GET /api/activity (admin or higher)
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ActivityQuery>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        ctx.require_admin()?;

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let entries = resources
            .database
            .activity_log()
            .list_recent(ctx.scope(), limit)
            .await?;
        Ok((StatusCode::OK, Json(ActivityResponse { entries })).into_response())
    }
}
