// ABOUTME: Database operations for Player Development Plans
// ABOUTME: Active-plan lookup, guarded archive, successor insert, and per-player history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Executor, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_optional_timestamp, parse_optional_uuid, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::Pdp;
use crate::permissions::DataScope;

const PDP_COLUMNS: &str = "id, player_id, coach_id, org_id, content, start_date, end_date, \
                           archived_at, created_at, updated_at";

/// A plan about to become a player's active plan
#[derive(Debug, Clone)]
pub struct NewPlan {
    /// Player the plan is for
    pub player_id: Uuid,
    /// Authoring coach
    pub coach_id: Option<Uuid>,
    /// Organization of the player
    pub org_id: String,
    /// Trimmed, non-empty content
    pub content: String,
    /// Activation instant
    pub start_date: DateTime<Utc>,
}

/// Plan database operations manager
///
/// Statements that take part in the archive/replace workflow are associated
/// functions generic over the executor so they can run inside a transaction.
pub struct PdpManager {
    pool: SqlitePool,
}

impl PdpManager {
    /// Create a new plan manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a plan by ID within a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, pdp_id: Uuid, scope: &DataScope) -> AppResult<Option<Pdp>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PDP_COLUMNS} FROM pdp WHERE id = "));
        query.push_bind(pdp_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(|r| row_to_pdp(&r)).transpose()
    }

    /// The player's active plan, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn active_for_player(&self, player_id: Uuid) -> AppResult<Option<Pdp>> {
        Self::fetch_active_for_player(&self.pool, player_id).await
    }

    /// All plans of a player: the active plan first, then archived plans newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_player(&self, player_id: Uuid) -> AppResult<Vec<Pdp>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PDP_COLUMNS} FROM pdp
            WHERE player_id = $1
            ORDER BY (archived_at IS NULL) DESC, archived_at DESC, start_date DESC
            "
        ))
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(row_to_pdp).collect()
    }

    /// Number of archived plans a player has
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_archived(&self, player_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM pdp WHERE player_id = $1 AND archived_at IS NOT NULL",
        )
        .bind(player_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count archived plans: {e}")))
    }

    /// Replace the content of a plan that is still active
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is archived or gone, or the update fails
    pub async fn update_content(&self, pdp_id: Uuid, content: &str) -> AppResult<Pdp> {
        let result = sqlx::query(
            "UPDATE pdp SET content = $1, updated_at = $2 WHERE id = $3 AND archived_at IS NULL",
        )
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(pdp_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input("Archived plans cannot be edited"));
        }
        self.get(pdp_id, &DataScope::Global)
            .await?
            .ok_or_else(|| AppError::not_found("Plan"))
    }

    /// Look up the active plan of a player on any executor
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_active_for_player<'e, E>(
        executor: E,
        player_id: Uuid,
    ) -> AppResult<Option<Pdp>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(
            r"
            SELECT id, player_id, coach_id, org_id, content, start_date, end_date,
                   archived_at, created_at, updated_at
            FROM pdp
            WHERE player_id = $1 AND archived_at IS NULL
            ",
        )
        .bind(player_id.to_string())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active plan: {e}")))?;

        row.map(|r| row_to_pdp(&r)).transpose()
    }

    /// Archive a plan if it is still active, setting `archived_at` and `end_date` to `now`
    ///
    /// Returns the archived row, or `None` when the plan was already archived
    /// by someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn mark_archived<'e, E>(
        executor: E,
        pdp_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Pdp>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(
            r"
            UPDATE pdp SET archived_at = $1, end_date = $1, updated_at = $1
            WHERE id = $2 AND archived_at IS NULL
            RETURNING id, player_id, coach_id, org_id, content, start_date, end_date,
                      archived_at, created_at, updated_at
            ",
        )
        .bind(now.to_rfc3339())
        .bind(pdp_id.to_string())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to archive plan: {e}")))?;

        row.map(|r| row_to_pdp(&r)).transpose()
    }

    /// Archive whatever plan is active for a player and return it
    ///
    /// This is a write, so inside a transaction it takes the write lock before
    /// anything is read; concurrent replacements queue behind it.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn archive_active_for_player<'e, E>(
        executor: E,
        player_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Pdp>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(
            r"
            UPDATE pdp SET archived_at = $1, end_date = $1, updated_at = $1
            WHERE player_id = $2 AND archived_at IS NULL
            RETURNING id, player_id, coach_id, org_id, content, start_date, end_date,
                      archived_at, created_at, updated_at
            ",
        )
        .bind(now.to_rfc3339())
        .bind(player_id.to_string())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to archive active plan: {e}")))?;

        row.map(|r| row_to_pdp(&r)).transpose()
    }

    /// Insert a new active plan
    ///
    /// # Errors
    ///
    /// Returns a conflict if the player already has an active plan, or a
    /// database error if the insert fails
    pub async fn insert_active<'e, E>(executor: E, plan: &NewPlan) -> AppResult<Pdp>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4();
        let stamp = plan.start_date.to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO pdp (
                id, player_id, coach_id, org_id, content, start_date,
                end_date, archived_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NULL, NULL, $6, $6)
            ",
        )
        .bind(id.to_string())
        .bind(plan.player_id.to_string())
        .bind(plan.coach_id.map(|c| c.to_string()))
        .bind(plan.org_id.clone())
        .bind(plan.content.clone())
        .bind(stamp)
        .execute(executor)
        .await
        .map_err(|e| AppError::from_write("Failed to create plan", &e))?;

        Ok(Pdp {
            id,
            player_id: plan.player_id,
            coach_id: plan.coach_id,
            org_id: plan.org_id.clone(),
            content: plan.content.clone(),
            start_date: plan.start_date,
            end_date: None,
            archived_at: None,
            created_at: plan.start_date,
            updated_at: plan.start_date,
        })
    }
}

fn row_to_pdp(row: &SqliteRow) -> AppResult<Pdp> {
    let id: String = row.get("id");
    let player_id: String = row.get("player_id");
    let start_date: String = row.get("start_date");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Pdp {
        id: parse_uuid(&id, "pdp.id")?,
        player_id: parse_uuid(&player_id, "pdp.player_id")?,
        coach_id: parse_optional_uuid(row.get("coach_id"), "pdp.coach_id")?,
        org_id: row.get("org_id"),
        content: row.get("content"),
        start_date: parse_timestamp(&start_date, "pdp.start_date")?,
        end_date: parse_optional_timestamp(row.get("end_date"), "pdp.end_date")?,
        archived_at: parse_optional_timestamp(row.get("archived_at"), "pdp.archived_at")?,
        created_at: parse_timestamp(&created_at, "pdp.created_at")?,
        updated_at: parse_timestamp(&updated_at, "pdp.updated_at")?,
    })
}
