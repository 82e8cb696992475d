// ABOUTME: Database operations for coaching observations
// ABOUTME: Atomic insert against the active plan, per-player listing, single and cascading archive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Executor, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{
    parse_date, parse_optional_timestamp, parse_optional_uuid, parse_timestamp, parse_uuid,
    require_text,
};
use crate::errors::{AppError, AppResult};
use crate::models::Observation;
use crate::permissions::DataScope;

const OBSERVATION_COLUMNS: &str = "id, player_id, pdp_id, coach_id, org_id, content, \
                                   observation_date, archived, archived_at, archived_by, \
                                   created_at, updated_at";

/// An observation about to be recorded
#[derive(Debug, Clone)]
pub struct NewObservation {
    /// Player observed
    pub player_id: Uuid,
    /// Recording coach
    pub coach_id: Option<Uuid>,
    /// Organization of the player
    pub org_id: String,
    /// Trimmed, non-empty note
    pub content: String,
    /// Date the observation refers to
    pub observation_date: NaiveDate,
    /// Insert instant
    pub created_at: DateTime<Utc>,
}

/// Edits to an active observation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateObservationRequest {
    /// New note text
    #[serde(default)]
    pub content: Option<String>,
    /// New observation date
    #[serde(default)]
    pub observation_date: Option<NaiveDate>,
}

/// Observation database operations manager
pub struct ObservationsManager {
    pool: SqlitePool,
}

impl ObservationsManager {
    /// Create a new observations manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an observation by ID within a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(
        &self,
        observation_id: Uuid,
        scope: &DataScope,
    ) -> AppResult<Option<Observation>> {
        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE id = "
        ));
        query.push_bind(observation_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get observation: {e}")))?;

        row.map(|r| row_to_observation(&r)).transpose()
    }

    /// Observations of a player, newest first
    ///
    /// Archived observations are only returned when `include_archived` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_player(
        &self,
        player_id: Uuid,
        include_archived: bool,
    ) -> AppResult<Vec<Observation>> {
        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE player_id = "
        ));
        query.push_bind(player_id.to_string());
        if !include_archived {
            query.push(" AND archived = 0");
        }
        query.push(" ORDER BY observation_date DESC, created_at DESC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list observations: {e}")))?;

        rows.iter().map(row_to_observation).collect()
    }

    /// Edit an observation that has not been archived
    ///
    /// # Errors
    ///
    /// Returns an error if a provided field is blank, the observation is
    /// archived, or the update fails
    pub async fn update(
        &self,
        observation_id: Uuid,
        request: &UpdateObservationRequest,
    ) -> AppResult<Observation> {
        let content = request
            .content
            .as_deref()
            .map(|c| require_text(c, "content"))
            .transpose()?;

        let result = sqlx::query(
            r"
            UPDATE observations SET
                content = COALESCE($1, content),
                observation_date = COALESCE($2, observation_date),
                updated_at = $3
            WHERE id = $4 AND archived = 0
            ",
        )
        .bind(content)
        .bind(request.observation_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(observation_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update observation: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input("Archived observations cannot be edited"));
        }
        self.get(observation_id, &DataScope::Global)
            .await?
            .ok_or_else(|| AppError::not_found("Observation"))
    }

    /// Archive one observation if it is not archived yet
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn archive(
        &self,
        observation_id: Uuid,
        archived_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE observations
            SET archived = 1, archived_at = $1, archived_by = $2, updated_at = $1
            WHERE id = $3 AND archived = 0
            ",
        )
        .bind(now.to_rfc3339())
        .bind(archived_by.map(|c| c.to_string()))
        .bind(observation_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to archive observation: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an observation
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, observation_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM observations WHERE id = $1")
            .bind(observation_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete observation: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert an observation attached to the player's active plan
    ///
    /// The plan lookup and the insert are one statement, so the observation
    /// can never attach to a plan archived in between. Returns `None`, having
    /// written nothing, when the player has no active plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_for_active_plan<'e, E>(
        executor: E,
        observation: &NewObservation,
    ) -> AppResult<Option<Observation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4();

        let pdp_id: Option<String> = sqlx::query_scalar(
            r"
            INSERT INTO observations (
                id, player_id, pdp_id, coach_id, org_id, content, observation_date,
                archived, archived_at, archived_by, created_at, updated_at
            )
            SELECT $1, $2, pdp.id, $3, $4, $5, $6, 0, NULL, NULL, $7, $7
            FROM pdp
            WHERE pdp.player_id = $2 AND pdp.archived_at IS NULL
            RETURNING pdp_id
            ",
        )
        .bind(id.to_string())
        .bind(observation.player_id.to_string())
        .bind(observation.coach_id.map(|c| c.to_string()))
        .bind(observation.org_id.clone())
        .bind(observation.content.clone())
        .bind(observation.observation_date.format("%Y-%m-%d").to_string())
        .bind(observation.created_at.to_rfc3339())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_write("Failed to create observation", &e))?;

        let Some(pdp_id) = pdp_id else {
            return Ok(None);
        };

        Ok(Some(Observation {
            id,
            player_id: observation.player_id,
            pdp_id: Some(parse_uuid(&pdp_id, "observations.pdp_id")?),
            coach_id: observation.coach_id,
            org_id: observation.org_id.clone(),
            content: observation.content.clone(),
            observation_date: observation.observation_date,
            archived: false,
            archived_at: None,
            archived_by: None,
            created_at: observation.created_at,
            updated_at: observation.created_at,
        }))
    }

    /// Archive every still-active observation attached to a plan
    ///
    /// Returns the number of observations archived.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn archive_for_plan<'e, E>(
        executor: E,
        pdp_id: Uuid,
        now: DateTime<Utc>,
        archived_by: Option<Uuid>,
    ) -> AppResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r"
            UPDATE observations
            SET archived = 1, archived_at = $1, archived_by = $2, updated_at = $1
            WHERE pdp_id = $3 AND archived_at IS NULL
            ",
        )
        .bind(now.to_rfc3339())
        .bind(archived_by.map(|c| c.to_string()))
        .bind(pdp_id.to_string())
        .execute(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to archive plan observations: {e}")))?;

        Ok(result.rows_affected())
    }
}

fn row_to_observation(row: &SqliteRow) -> AppResult<Observation> {
    let id: String = row.get("id");
    let player_id: String = row.get("player_id");
    let observation_date: String = row.get("observation_date");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Observation {
        id: parse_uuid(&id, "observations.id")?,
        player_id: parse_uuid(&player_id, "observations.player_id")?,
        pdp_id: parse_optional_uuid(row.get("pdp_id"), "observations.pdp_id")?,
        coach_id: parse_optional_uuid(row.get("coach_id"), "observations.coach_id")?,
        org_id: row.get("org_id"),
        content: row.get("content"),
        observation_date: parse_date(&observation_date, "observations.observation_date")?,
        archived: row.get("archived"),
        archived_at: parse_optional_timestamp(row.get("archived_at"), "observations.archived_at")?,
        archived_by: parse_optional_uuid(row.get("archived_by"), "observations.archived_by")?,
        created_at: parse_timestamp(&created_at, "observations.created_at")?,
        updated_at: parse_timestamp(&updated_at, "observations.updated_at")?,
    })
}
