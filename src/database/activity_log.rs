// ABOUTME: Activity log storage for coach actions
// ABOUTME: Writes are best-effort; failures are logged and never fail the caller's workflow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, warn};

use super::{parse_optional_uuid, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityAction, ActivityLogEntry};
use crate::permissions::DataScope;

/// Activity log database operations manager
pub struct ActivityLogManager {
    pool: SqlitePool,
}

impl ActivityLogManager {
    /// Create a new activity log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry
    ///
    /// # Errors
    ///
    /// Returns an error if the details cannot be serialized or the insert fails
    pub async fn record(&self, entry: &ActivityLogEntry) -> AppResult<()> {
        let details = serde_json::to_string(&entry.details)?;

        sqlx::query(
            r"
            INSERT INTO activity_log (
                id, coach_id, org_id, action, entity_type, entity_id, details, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.coach_id.map(|c| c.to_string()))
        .bind(&entry.org_id)
        .bind(entry.action.as_str())
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(details)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record activity: {e}")))?;

        Ok(())
    }

    /// Write an entry, logging and discarding any failure
    pub async fn record_best_effort(&self, entry: ActivityLogEntry) {
        match self.record(&entry).await {
            Ok(()) => debug!(
                action = entry.action.as_str(),
                entity_id = entry.entity_id.as_deref().unwrap_or_default(),
                "Activity recorded"
            ),
            Err(e) => warn!(
                action = entry.action.as_str(),
                error = %e,
                "Failed to record activity"
            ),
        }
    }

    /// Most recent entries visible under a scope
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_recent(
        &self,
        scope: &DataScope,
        limit: u32,
    ) -> AppResult<Vec<ActivityLogEntry>> {
        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, coach_id, org_id, action, entity_type, entity_id, details, created_at \
             FROM activity_log WHERE 1 = 1",
        );
        scope.push_filter(&mut query, "org_id");
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(limit));

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list activity: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &SqliteRow) -> AppResult<ActivityLogEntry> {
    let id: String = row.get("id");
    let action: String = row.get("action");
    let details: String = row.get("details");
    let created_at: String = row.get("created_at");

    let action = ActivityAction::parse(&action)
        .ok_or_else(|| AppError::internal(format!("Unknown activity action: {action}")))?;
    let details = serde_json::from_str(&details)
        .map_err(|e| AppError::internal(format!("Invalid JSON in activity details: {e}")))?;

    Ok(ActivityLogEntry {
        id: parse_uuid(&id, "activity_log.id")?,
        coach_id: parse_optional_uuid(row.get("coach_id"), "activity_log.coach_id")?,
        org_id: row.get("org_id"),
        action,
        entity_type: row.get("entity_type"),
        entity_id: row.get("entity_id"),
        details,
        created_at: parse_timestamp(&created_at, "activity_log.created_at")?,
    })
}
