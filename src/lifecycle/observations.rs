// ABOUTME: Observation workflows: record against the active plan, edit, archive, delete
// ABOUTME: Recording fails with no-active-plan and writes nothing when the player has no plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::context::CoachContext;
use crate::database::{
    require_text, Database, NewObservation, ObservationsManager, UpdateObservationRequest,
};
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityAction, ActivityLogEntry, Observation};

/// Input for recording an observation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateObservation {
    /// Note text
    pub content: String,
    /// Date observed; today (UTC) when absent
    #[serde(default)]
    pub observation_date: Option<NaiveDate>,
}

/// Observation workflows for one database
pub struct ObservationService<'a> {
    database: &'a Database,
}

impl<'a> ObservationService<'a> {
    /// Create a service over a database
    #[must_use]
    pub const fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Record an observation against the player's active plan
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `MissingRequiredField` if the content is blank (before any query)
    /// - `ResourceNotFound` if the player is not visible
    /// - `PermissionDenied` if the player's organization is off limits
    /// - `NoActivePlan` if the player has no active plan; nothing is written
    pub async fn create_observation(
        &self,
        ctx: &CoachContext,
        player_id: Uuid,
        input: &CreateObservation,
    ) -> AppResult<Observation> {
        let content = require_text(&input.content, "content")?;
        let player = self
            .database
            .players()
            .get(player_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Player"))?;
        ctx.require_org_access(&player.org_id)?;

        let now = Utc::now();
        let observation = ObservationsManager::insert_for_active_plan(
            self.database.pool(),
            &NewObservation {
                player_id: player.id,
                coach_id: Some(ctx.coach_id()),
                org_id: player.org_id.clone(),
                content,
                observation_date: input.observation_date.unwrap_or_else(|| now.date_naive()),
                created_at: now,
            },
        )
        .await?
        .ok_or_else(|| {
            AppError::no_active_plan("Create a development plan before recording observations")
        })?;

        info!(player_id = %player.id, observation_id = %observation.id, "Observation recorded");
        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::ObservationCreated)
                .with_entity(observation.id)
                .with_details(json!({ "player_id": player.id, "pdp_id": observation.pdp_id })),
            &player.org_id,
        )
        .await;

        Ok(observation)
    }

    /// Edit an observation's content or date
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the observation is archived, `ResourceNotFound`
    /// if it is not visible, and `PermissionDenied` if its organization is off limits
    pub async fn update_observation(
        &self,
        ctx: &CoachContext,
        observation_id: Uuid,
        request: &UpdateObservationRequest,
    ) -> AppResult<Observation> {
        if let Some(content) = request.content.as_deref() {
            require_text(content, "content")?;
        }
        let existing = self.visible(ctx, observation_id).await?;
        ctx.require_org_access(&existing.org_id)?;
        if existing.archived {
            return Err(AppError::invalid_input("Archived observations cannot be edited"));
        }

        self.database
            .observations()
            .update(observation_id, request)
            .await
    }

    /// Archive one observation
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if it is already archived, plus the
    /// visibility and permission errors of [`Self::update_observation`]
    pub async fn archive_observation(
        &self,
        ctx: &CoachContext,
        observation_id: Uuid,
    ) -> AppResult<Observation> {
        let existing = self.visible(ctx, observation_id).await?;
        ctx.require_org_access(&existing.org_id)?;

        let now = Utc::now();
        let archived = self
            .database
            .observations()
            .archive(observation_id, Some(ctx.coach_id()), now)
            .await?;
        if !archived {
            return Err(AppError::conflict("Observation is already archived"));
        }

        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::ObservationArchived).with_entity(observation_id),
            &existing.org_id,
        )
        .await;

        Ok(Observation {
            archived: true,
            archived_at: Some(now),
            archived_by: Some(ctx.coach_id()),
            updated_at: now,
            ..existing
        })
    }

    /// Delete an observation
    ///
    /// # Errors
    ///
    /// Returns the visibility and permission errors of [`Self::update_observation`]
    pub async fn delete_observation(
        &self,
        ctx: &CoachContext,
        observation_id: Uuid,
    ) -> AppResult<()> {
        let existing = self.visible(ctx, observation_id).await?;
        ctx.require_org_access(&existing.org_id)?;

        if !self.database.observations().delete(observation_id).await? {
            return Err(AppError::not_found("Observation"));
        }

        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::ObservationDeleted)
                .with_entity(observation_id)
                .with_details(json!({ "player_id": existing.player_id })),
            &existing.org_id,
        )
        .await;

        Ok(())
    }

    async fn visible(&self, ctx: &CoachContext, observation_id: Uuid) -> AppResult<Observation> {
        self.database
            .observations()
            .get(observation_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Observation"))
    }

    async fn log_activity(&self, ctx: &CoachContext, entry: ActivityLogEntry, org_id: &str) {
        let entry = entry.with_coach(ctx.coach_id()).with_org(org_id);
        self.database.activity_log().record_best_effort(entry).await;
    }
}
