// ABOUTME: Database operations for teams owned by coaches inside an organization
// ABOUTME: Scoped listing with an optional owner filter, CRUD, and per-organization counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_timestamp, parse_uuid, require_text};
use crate::errors::{AppError, AppResult};
use crate::models::Team;
use crate::permissions::DataScope;

const TEAM_COLUMNS: &str = "id, name, coach_id, org_id, created_at, updated_at";

/// Request to create a team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    /// Team name
    pub name: String,
    /// Organization, defaulting to the creating coach's
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Request to update a team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamRequest {
    /// New name
    pub name: Option<String>,
    /// New owning coach
    pub coach_id: Option<Uuid>,
}

/// Filter for listing teams
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTeamsFilter {
    /// Only teams owned by this coach
    pub coach_id: Option<Uuid>,
}

/// Team database operations manager
pub struct TeamsManager {
    pool: SqlitePool,
}

impl TeamsManager {
    /// Create a new teams manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team owned by a coach
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the organization does not
    /// exist, or the insert fails
    pub async fn create(&self, coach_id: Uuid, org_id: &str, name: &str) -> AppResult<Team> {
        let name = require_text(name, "name")?;
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO teams (id, name, coach_id, org_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(id.to_string())
        .bind(&name)
        .bind(coach_id.to_string())
        .bind(org_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to create team", &e))?;

        Ok(Team {
            id,
            name,
            coach_id: Some(coach_id),
            org_id: org_id.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a team by ID within a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, team_id: Uuid, scope: &DataScope) -> AppResult<Option<Team>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = "));
        query.push_bind(team_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get team: {e}")))?;

        row.map(|r| row_to_team(&r)).transpose()
    }

    /// List teams visible under a scope, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, scope: &DataScope, filter: &ListTeamsFilter) -> AppResult<Vec<Team>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {TEAM_COLUMNS} FROM teams WHERE 1 = 1"));
        scope.push_filter(&mut query, "org_id");
        if let Some(coach_id) = filter.coach_id {
            query.push(" AND coach_id = ").push_bind(coach_id.to_string());
        }
        query.push(" ORDER BY name ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list teams: {e}")))?;

        rows.iter().map(row_to_team).collect()
    }

    /// Update a team's name or owner
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the team or new owner does not
    /// exist, or the update fails
    pub async fn update(&self, team_id: Uuid, request: &UpdateTeamRequest) -> AppResult<Team> {
        let name = request
            .name
            .as_deref()
            .map(|n| require_text(n, "name"))
            .transpose()?;

        let result = sqlx::query(
            r"
            UPDATE teams SET
                name = COALESCE($1, name),
                coach_id = COALESCE($2, coach_id),
                updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(name)
        .bind(request.coach_id.map(|id| id.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(team_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to update team", &e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Team"));
        }
        self.get(team_id, &DataScope::Global)
            .await?
            .ok_or_else(|| AppError::not_found("Team"))
    }

    /// Delete a team; its players become unassigned
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, team_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete team: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of teams in an organization
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_for_org(&self, org_id: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE org_id = $1")
            .bind(org_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count teams: {e}")))
    }
}

fn row_to_team(row: &SqliteRow) -> AppResult<Team> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Team {
        id: parse_uuid(&id, "teams.id")?,
        name: row.get("name"),
        coach_id: parse_optional_uuid(row.get("coach_id"), "teams.coach_id")?,
        org_id: row.get("org_id"),
        created_at: parse_timestamp(&created_at, "teams.created_at")?,
        updated_at: parse_timestamp(&updated_at, "teams.updated_at")?,
    })
}
