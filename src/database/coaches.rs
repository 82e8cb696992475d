// ABOUTME: Database operations for coach accounts linked to external identities
// ABOUTME: Lookup by auth identity, profile updates, role flag changes, and scoped listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid, require_text};
use crate::errors::{AppError, AppResult};
use crate::models::Coach;
use crate::permissions::DataScope;

const COACH_COLUMNS: &str = "id, auth_uid, first_name, last_name, email, is_admin, \
                             is_superadmin, active, org_id, created_at, updated_at";

/// Request to create a coach account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCoachRequest {
    /// External identity
    pub auth_uid: String,
    /// Contact email
    pub email: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Organization to join
    #[serde(default)]
    pub org_id: Option<String>,
    /// Organization administrator
    #[serde(default)]
    pub is_admin: bool,
    /// Platform-wide administrator
    #[serde(default)]
    pub is_superadmin: bool,
}

/// Profile fields a coach may change on their own record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCoachRequest {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New contact email
    pub email: Option<String>,
}

/// Role and membership changes reserved for administrators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachFlagsUpdate {
    /// Organization administrator flag
    pub is_admin: Option<bool>,
    /// Platform-wide administrator flag
    pub is_superadmin: Option<bool>,
    /// Whether the account may sign in
    pub active: Option<bool>,
    /// Move the coach to another organization
    pub org_id: Option<String>,
}

/// Coach database operations manager
pub struct CoachesManager {
    pool: SqlitePool,
}

impl CoachesManager {
    /// Create a new coaches manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a coach account
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are blank, the identity already
    /// has a coach record, or the insert fails
    pub async fn create(&self, request: &CreateCoachRequest) -> AppResult<Coach> {
        let auth_uid = require_text(&request.auth_uid, "auth_uid")?;
        let email = require_text(&request.email, "email")?;
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO coaches (
                id, auth_uid, first_name, last_name, email, is_admin,
                is_superadmin, active, org_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 1, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(&auth_uid)
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(&email)
        .bind(request.is_admin)
        .bind(request.is_superadmin)
        .bind(&request.org_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to create coach", &e))?;

        Ok(Coach {
            id,
            auth_uid,
            first_name: request.first_name.trim().to_owned(),
            last_name: request.last_name.trim().to_owned(),
            email,
            is_admin: request.is_admin,
            is_superadmin: request.is_superadmin,
            active: true,
            org_id: request.org_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get the coach linked to an external identity
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_by_auth_uid(&self, auth_uid: &str) -> AppResult<Option<Coach>> {
        let row = sqlx::query(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches WHERE auth_uid = $1"
        ))
        .bind(auth_uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get coach by identity: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Get a coach by ID within a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, coach_id: Uuid, scope: &DataScope) -> AppResult<Option<Coach>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = "));
        query.push_bind(coach_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get coach: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// List coaches visible under a scope, ordered by last name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, scope: &DataScope) -> AppResult<Vec<Coach>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COACH_COLUMNS} FROM coaches WHERE 1 = 1"));
        scope.push_filter(&mut query, "org_id");
        query.push(" ORDER BY last_name ASC, first_name ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list coaches: {e}")))?;

        rows.iter().map(row_to_coach).collect()
    }

    /// Update profile fields on a coach record
    ///
    /// # Errors
    ///
    /// Returns an error if the coach does not exist, a provided field is
    /// blank, or the update fails
    pub async fn update_profile(
        &self,
        coach_id: Uuid,
        request: &UpdateCoachRequest,
    ) -> AppResult<Coach> {
        let email = request
            .email
            .as_deref()
            .map(|e| require_text(e, "email"))
            .transpose()?;

        let result = sqlx::query(
            r"
            UPDATE coaches SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                email = COALESCE($3, email),
                updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(request.first_name.as_deref().map(str::trim))
        .bind(request.last_name.as_deref().map(str::trim))
        .bind(email)
        .bind(Utc::now().to_rfc3339())
        .bind(coach_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update coach: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Coach"));
        }
        self.get(coach_id, &DataScope::Global)
            .await?
            .ok_or_else(|| AppError::not_found("Coach"))
    }

    /// Change role flags, activity, or organization of a coach
    ///
    /// # Errors
    ///
    /// Returns an error if the coach does not exist, the organization is
    /// unknown, or the update fails
    pub async fn update_flags(
        &self,
        coach_id: Uuid,
        update: &CoachFlagsUpdate,
    ) -> AppResult<Coach> {
        let result = sqlx::query(
            r"
            UPDATE coaches SET
                is_admin = COALESCE($1, is_admin),
                is_superadmin = COALESCE($2, is_superadmin),
                active = COALESCE($3, active),
                org_id = COALESCE($4, org_id),
                updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(update.is_admin)
        .bind(update.is_superadmin)
        .bind(update.active)
        .bind(&update.org_id)
        .bind(Utc::now().to_rfc3339())
        .bind(coach_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write("Failed to update coach flags", &e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Coach"));
        }
        self.get(coach_id, &DataScope::Global)
            .await?
            .ok_or_else(|| AppError::not_found("Coach"))
    }

    /// Deactivate a coach so they can no longer sign in
    ///
    /// # Errors
    ///
    /// Returns an error if the coach does not exist or the update fails
    pub async fn deactivate(&self, coach_id: Uuid) -> AppResult<Coach> {
        let update = CoachFlagsUpdate {
            active: Some(false),
            ..CoachFlagsUpdate::default()
        };
        self.update_flags(coach_id, &update).await
    }

    /// Delete a coach within a scope
    ///
    /// Teams, plans, and observations keep their rows with the coach cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(&self, coach_id: Uuid, scope: &DataScope) -> AppResult<bool> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("DELETE FROM coaches WHERE id = ");
        query.push_bind(coach_id.to_string());
        scope.push_filter(&mut query, "org_id");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete coach: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_coach(row: &SqliteRow) -> AppResult<Coach> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    // Absent flags read as false so a malformed record gets the lowest role
    let is_admin: Option<bool> = row.get("is_admin");
    let is_superadmin: Option<bool> = row.get("is_superadmin");

    Ok(Coach {
        id: parse_uuid(&id, "coaches.id")?,
        auth_uid: row.get("auth_uid"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        is_admin: is_admin.unwrap_or(false),
        is_superadmin: is_superadmin.unwrap_or(false),
        active: row.get("active"),
        org_id: row.get("org_id"),
        created_at: parse_timestamp(&created_at, "coaches.created_at")?,
        updated_at: parse_timestamp(&updated_at, "coaches.updated_at")?,
    })
}
