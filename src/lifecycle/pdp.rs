// ABOUTME: Player Development Plan workflows: create, edit, archive, and archive-and-replace
// ABOUTME: Archive and replace run in a single transaction stamped with one instant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::context::CoachContext;
use crate::database::{
    require_text, Database, NewPlan, ObservationsManager, PdpManager, SqliteTransactionGuard,
};
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityAction, ActivityLogEntry, Pdp, Player};

/// Whether a player currently has a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "plan", rename_all = "snake_case")]
pub enum PlanState {
    /// The player has no active plan
    NoActivePlan,
    /// The player's current plan
    ActivePlan(Pdp),
}

impl PlanState {
    /// The active plan, if any
    #[must_use]
    pub const fn active(&self) -> Option<&Pdp> {
        match self {
            Self::NoActivePlan => None,
            Self::ActivePlan(plan) => Some(plan),
        }
    }
}

/// Result of archiving a plan without a successor
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutcome {
    /// The plan as archived
    pub archived: Pdp,
    /// Observations archived with it
    pub observations_archived: u64,
}

/// Result of archiving a plan and starting its successor
#[derive(Debug, Clone, Serialize)]
pub struct ReplaceOutcome {
    /// The previous plan as archived
    pub archived: Pdp,
    /// The new active plan
    pub active: Pdp,
    /// Observations archived with the previous plan
    pub observations_archived: u64,
}

/// Plan workflows for one database
pub struct PdpLifecycle<'a> {
    database: &'a Database,
}

impl<'a> PdpLifecycle<'a> {
    /// Create a lifecycle over a database
    #[must_use]
    pub const fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Current plan state of a visible player
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the player is outside the coach's scope
    pub async fn plan_state(&self, ctx: &CoachContext, player_id: Uuid) -> AppResult<PlanState> {
        self.visible_player(ctx, player_id).await?;
        let state = self
            .database
            .pdps()
            .active_for_player(player_id)
            .await?
            .map_or(PlanState::NoActivePlan, PlanState::ActivePlan);
        Ok(state)
    }

    /// Start a player's first plan, or a new one after the last was archived
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `MissingRequiredField` if the content is blank (before any query)
    /// - `ResourceNotFound` if the player is not visible
    /// - `PermissionDenied` if the player's organization is off limits
    /// - `ResourceConflict` if the player already has an active plan
    pub async fn create_plan(
        &self,
        ctx: &CoachContext,
        player_id: Uuid,
        content: &str,
    ) -> AppResult<Pdp> {
        let content = require_text(content, "content")?;
        let player = self.visible_player(ctx, player_id).await?;
        ctx.require_org_access(&player.org_id)?;

        if self.database.pdps().active_for_player(player.id).await?.is_some() {
            return Err(AppError::conflict(
                "An active plan already exists for this player",
            ));
        }

        // The partial unique index catches a create racing this one
        let plan = PdpManager::insert_active(
            self.database.pool(),
            &NewPlan {
                player_id: player.id,
                coach_id: Some(ctx.coach_id()),
                org_id: player.org_id.clone(),
                content,
                start_date: Utc::now(),
            },
        )
        .await?;

        info!(player_id = %player.id, pdp_id = %plan.id, "Plan created");
        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::PlanCreated)
                .with_entity(plan.id)
                .with_details(json!({ "player_id": player.id })),
            &player.org_id,
        )
        .await;

        Ok(plan)
    }

    /// Edit the content of an active plan
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the plan is archived, `ResourceNotFound` if it
    /// is not visible, and `PermissionDenied` if its organization is off limits
    pub async fn update_plan(
        &self,
        ctx: &CoachContext,
        pdp_id: Uuid,
        content: &str,
    ) -> AppResult<Pdp> {
        let content = require_text(content, "content")?;
        let plan = self.visible_plan(ctx, pdp_id).await?;
        ctx.require_org_access(&plan.org_id)?;
        if !plan.is_active() {
            return Err(AppError::invalid_input("Archived plans cannot be edited"));
        }

        let updated = self.database.pdps().update_content(pdp_id, &content).await?;

        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::PlanUpdated).with_entity(pdp_id),
            &plan.org_id,
        )
        .await;

        Ok(updated)
    }

    /// Archive an active plan and its observations without starting a new one
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if the plan is already archived, plus the
    /// visibility and permission errors of [`Self::update_plan`]
    pub async fn archive_plan(
        &self,
        ctx: &CoachContext,
        pdp_id: Uuid,
    ) -> AppResult<ArchiveOutcome> {
        let plan = self.visible_plan(ctx, pdp_id).await?;
        ctx.require_org_access(&plan.org_id)?;

        let now = Utc::now();
        let actor = Some(ctx.coach_id());

        let tx = self
            .database
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        let Some(archived) = PdpManager::mark_archived(guard.executor()?, pdp_id, now).await?
        else {
            return Err(AppError::conflict("Plan was already archived; reload and try again"));
        };
        let observations_archived =
            ObservationsManager::archive_for_plan(guard.executor()?, pdp_id, now, actor).await?;

        guard.commit().await?;

        info!(%pdp_id, observations_archived, "Plan archived");
        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::PlanArchived)
                .with_entity(pdp_id)
                .with_details(json!({
                    "player_id": archived.player_id,
                    "observations_archived": observations_archived,
                })),
            &archived.org_id,
        )
        .await;

        Ok(ArchiveOutcome {
            archived,
            observations_archived,
        })
    }

    /// Archive the player's active plan with its observations and start a successor
    ///
    /// All three writes share one instant and one transaction: the old plan's
    /// `archived_at` and `end_date`, each observation's `archived_at`, and the
    /// new plan's `start_date` are equal. When `expected_pdp_id` is given it
    /// must name the plan that is active at commit time.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `MissingRequiredField` if the content is blank (before any query)
    /// - `ResourceNotFound` if the player is not visible
    /// - `PermissionDenied` if the player's organization is off limits
    /// - `NoActivePlan` if there is nothing to replace
    /// - `ResourceConflict` if another change won the race
    pub async fn archive_and_replace(
        &self,
        ctx: &CoachContext,
        player_id: Uuid,
        content: &str,
        expected_pdp_id: Option<Uuid>,
    ) -> AppResult<ReplaceOutcome> {
        let content = require_text(content, "content")?;
        let player = self.visible_player(ctx, player_id).await?;
        ctx.require_org_access(&player.org_id)?;

        let now = Utc::now();
        let actor = Some(ctx.coach_id());

        let tx = self
            .database
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        // Write first so the transaction holds the write lock before it reads
        let archived = PdpManager::archive_active_for_player(guard.executor()?, player.id, now)
            .await?
            .ok_or_else(|| AppError::no_active_plan("Player has no active plan to replace"))?;

        if let Some(expected) = expected_pdp_id {
            if archived.id != expected {
                return Err(AppError::conflict(
                    "The active plan changed since it was loaded; reload and try again",
                ));
            }
        }

        let observations_archived =
            ObservationsManager::archive_for_plan(guard.executor()?, archived.id, now, actor)
                .await?;

        let active = PdpManager::insert_active(
            guard.executor()?,
            &NewPlan {
                player_id: player.id,
                coach_id: actor,
                org_id: player.org_id.clone(),
                content,
                start_date: now,
            },
        )
        .await?;

        guard.commit().await?;

        info!(
            player_id = %player.id,
            archived_pdp_id = %archived.id,
            active_pdp_id = %active.id,
            observations_archived,
            "Plan replaced"
        );
        self.log_activity(
            ctx,
            ActivityLogEntry::new(ActivityAction::PlanReplaced)
                .with_entity(active.id)
                .with_details(json!({
                    "player_id": player.id,
                    "archived_pdp_id": archived.id,
                    "observations_archived": observations_archived,
                })),
            &player.org_id,
        )
        .await;

        Ok(ReplaceOutcome {
            archived,
            active,
            observations_archived,
        })
    }

    async fn visible_player(&self, ctx: &CoachContext, player_id: Uuid) -> AppResult<Player> {
        self.database
            .players()
            .get(player_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Player"))
    }

    async fn visible_plan(&self, ctx: &CoachContext, pdp_id: Uuid) -> AppResult<Pdp> {
        self.database
            .pdps()
            .get(pdp_id, ctx.scope())
            .await?
            .ok_or_else(|| AppError::not_found("Plan"))
    }

    async fn log_activity(&self, ctx: &CoachContext, entry: ActivityLogEntry, org_id: &str) {
        let entry = entry.with_coach(ctx.coach_id()).with_org(org_id);
        self.database.activity_log().record_best_effort(entry).await;
    }
}
