// ABOUTME: Database operations for organizations, the tenant boundary for coaching data
// ABOUTME: Create, fetch, and scoped listing of organizations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, require_text};
use crate::errors::{AppError, AppResult};
use crate::models::Organization;
use crate::permissions::DataScope;

/// Organization database operations manager
pub struct OrganizationsManager {
    pool: SqlitePool,
}

impl OrganizationsManager {
    /// Create a new organizations manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an organization, generating an identifier when none is given
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the identifier is taken, or the
    /// insert fails
    pub async fn create(&self, id: Option<&str>, name: &str) -> AppResult<Organization> {
        let name = require_text(name, "name")?;
        let id = id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
        let now = Utc::now();

        sqlx::query("INSERT INTO orgs (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(&name)
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write("Failed to create organization", &e))?;

        Ok(Organization {
            id,
            name,
            created_at: now,
        })
    }

    /// Get an organization by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, org_id: &str) -> AppResult<Option<Organization>> {
        let row = sqlx::query("SELECT id, name, created_at FROM orgs WHERE id = $1")
            .bind(org_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get organization: {e}")))?;

        row.map(|r| row_to_organization(&r)).transpose()
    }

    /// List organizations visible under a scope, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, scope: &DataScope) -> AppResult<Vec<Organization>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, name, created_at FROM orgs WHERE 1 = 1");
        scope.push_filter(&mut query, "id");
        query.push(" ORDER BY name ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list organizations: {e}")))?;

        rows.iter().map(row_to_organization).collect()
    }
}

fn row_to_organization(row: &SqliteRow) -> AppResult<Organization> {
    let created_at: String = row.get("created_at");
    Ok(Organization {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_timestamp(&created_at, "orgs.created_at")?,
    })
}
