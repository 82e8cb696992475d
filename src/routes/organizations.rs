// ABOUTME: Organization routes: scoped listing, lookup, and superadmin-only creation
// ABOUTME: Coaches see only their own organization; superadmins see and create any
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{ActivityAction, ActivityLogEntry, Organization};
use crate::resources::ServerResources;
use crate::routes::coach_context;

/// Request body for creating an organization
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Optional explicit identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    pub name: String,
}

/// Response for listing organizations
#[derive(Debug, Serialize, Deserialize)]
pub struct OrganizationListResponse {
    /// Organizations visible to the caller
    pub organizations: Vec<Organization>,
    /// Number returned
    pub total: usize,
}

/// Organization routes
pub struct OrganizationRoutes;

impl OrganizationRoutes {
    /// Create all organization routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/organizations",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/organizations/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/organizations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        let organizations = resources.database.organizations().list(ctx.scope()).await?;
        let total = organizations.len();
        Ok((
            StatusCode::OK,
            Json(OrganizationListResponse {
                organizations,
                total,
            }),
        )
            .into_response())
    }

    /// Handle GET /api/organizations/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(org_id): Path<String>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        if !ctx.scope().allows(&org_id) {
            return Err(AppError::not_found("Organization"));
        }
        let organization = resources
            .database
            .organizations()
            .get(&org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization"))?;
        Ok((StatusCode::OK, Json(organization)).into_response())
    }

    /// Handle POST /api/organizations (superadmin only)
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateOrganizationRequest>,
    ) -> Result<Response, AppError> {
        let ctx = coach_context(&headers, &resources).await?;
        ctx.require_superadmin()?;

        let organization = resources
            .database
            .organizations()
            .create(request.id.as_deref(), &request.name)
            .await?;

        resources
            .database
            .activity_log()
            .record_best_effort(
                ActivityLogEntry::new(ActivityAction::OrganizationCreated)
                    .with_coach(ctx.coach_id())
                    .with_org(organization.id.clone())
                    .with_entity(&organization.id),
            )
            .await;

        Ok((StatusCode::CREATED, Json(organization)).into_response())
    }
}
