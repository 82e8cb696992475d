// ABOUTME: Database operations for the player roster
// ABOUTME: Scoped listing by team or unassigned, CRUD, and team/organization consistency checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{page_bounds, parse_optional_uuid, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::Player;
use crate::permissions::DataScope;

const PLAYER_COLUMNS: &str =
    "id, name, first_name, last_name, team_id, org_id, created_at, updated_at";

const DEFAULT_PAGE_SIZE: u32 = 200;

/// Request to add a player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    /// Display name; composed from first/last name when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Team to place the player on
    #[serde(default)]
    pub team_id: Option<Uuid>,
    /// Organization, defaulting to the creating coach's
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Request to rename or move a player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlayerRequest {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// New family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Move to this team
    #[serde(default)]
    pub team_id: Option<Uuid>,
    /// Remove the player from their team
    #[serde(default)]
    pub clear_team: bool,
}

/// Filter for listing players
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPlayersFilter {
    /// Only players on this team
    pub team_id: Option<Uuid>,
    /// Only players without a team
    #[serde(default)]
    pub unassigned_only: bool,
    /// Maximum number of rows
    pub limit: Option<u32>,
    /// Rows to skip
    pub offset: Option<u32>,
}

/// Player database operations manager
pub struct PlayersManager {
    pool: SqlitePool,
}

impl PlayersManager {
    /// Create a new players manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a player to an organization
    ///
    /// # Errors
    ///
    /// Returns an error if no name can be composed, the team belongs to a
    /// different organization, or the insert fails
    pub async fn create(&self, org_id: &str, request: &CreatePlayerRequest) -> AppResult<Player> {
        let name = Player::compose_name(
            request.name.as_deref(),
            request.first_name.as_deref(),
            request.last_name.as_deref(),
        )
        .ok_or_else(|| AppError::missing_field("name"))?;

        if let Some(team_id) = request.team_id {
            self.ensure_team_in_org(team_id, org_id).await?;
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let first_name = trimmed(request.first_name.as_deref());
        let last_name = trimmed(request.last_name.as_deref());

        sqlx::query(
            r"
            INSERT INTO players (
                id, name, first_name, last_name, team_id, org_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(id.to_string())
        .bind(&name)
        .bind(&first_name)
        .bind(&last_name)
        .bind(request.team_id.map(|t| t.to_string()))
        .bind(org_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to create player", &e))?;

        Ok(Player {
            id,
            name,
            first_name,
            last_name,
            team_id: request.team_id,
            org_id: org_id.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a player by ID within a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, player_id: Uuid, scope: &DataScope) -> AppResult<Option<Player>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = "));
        query.push_bind(player_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get player: {e}")))?;

        row.map(|r| row_to_player(&r)).transpose()
    }

    /// List players visible under a scope, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(
        &self,
        scope: &DataScope,
        filter: &ListPlayersFilter,
    ) -> AppResult<Vec<Player>> {
        let (limit, offset) = page_bounds(filter.limit, filter.offset, DEFAULT_PAGE_SIZE);

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PLAYER_COLUMNS} FROM players WHERE 1 = 1"));
        scope.push_filter(&mut query, "org_id");
        if filter.unassigned_only {
            query.push(" AND team_id IS NULL");
        } else if let Some(team_id) = filter.team_id {
            query.push(" AND team_id = ").push_bind(team_id.to_string());
        }
        query
            .push(" ORDER BY name ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list players: {e}")))?;

        rows.iter().map(row_to_player).collect()
    }

    /// Rename a player or move them between teams
    ///
    /// # Errors
    ///
    /// Returns an error if the player does not exist, the new team belongs to
    /// a different organization, or the update fails
    pub async fn update(
        &self,
        player: &Player,
        request: &UpdatePlayerRequest,
    ) -> AppResult<Player> {
        let first_name =
            trimmed(request.first_name.as_deref()).or_else(|| player.first_name.clone());
        let last_name = trimmed(request.last_name.as_deref()).or_else(|| player.last_name.clone());

        // An explicit name wins; otherwise recompose only if a name part changed
        let name = match request.name.as_deref() {
            Some(name) => Player::compose_name(Some(name), None, None)
                .ok_or_else(|| AppError::missing_field("name"))?,
            None if request.first_name.is_some() || request.last_name.is_some() => {
                Player::compose_name(None, first_name.as_deref(), last_name.as_deref())
                    .unwrap_or_else(|| player.name.clone())
            }
            None => player.name.clone(),
        };

        let team_id = if request.clear_team {
            None
        } else if let Some(team_id) = request.team_id {
            self.ensure_team_in_org(team_id, &player.org_id).await?;
            Some(team_id)
        } else {
            player.team_id
        };

        let now = Utc::now();
        let result = sqlx::query(
            r"
            UPDATE players SET
                name = $1, first_name = $2, last_name = $3, team_id = $4, updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(&name)
        .bind(&first_name)
        .bind(&last_name)
        .bind(team_id.map(|t| t.to_string()))
        .bind(now.to_rfc3339())
        .bind(player.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to update player", &e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Player"));
        }

        Ok(Player {
            name,
            first_name,
            last_name,
            team_id,
            updated_at: now,
            ..player.clone()
        })
    }

    /// Delete a player together with their plans and observations
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, player_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete player: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_team_in_org(&self, team_id: Uuid, org_id: &str) -> AppResult<()> {
        let team_org: Option<String> = sqlx::query_scalar("SELECT org_id FROM teams WHERE id = $1")
            .bind(team_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up team: {e}")))?;

        match team_org {
            Some(team_org) if team_org == org_id => Ok(()),
            Some(_) => Err(AppError::invalid_input(
                "Team belongs to a different organization",
            )),
            None => Err(AppError::not_found("Team")),
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn row_to_player(row: &SqliteRow) -> AppResult<Player> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Player {
        id: parse_uuid(&id, "players.id")?,
        name: row.get("name"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        team_id: parse_optional_uuid(row.get("team_id"), "players.team_id")?,
        org_id: row.get("org_id"),
        created_at: parse_timestamp(&created_at, "players.created_at")?,
        updated_at: parse_timestamp(&updated_at, "players.updated_at")?,
    })
}
