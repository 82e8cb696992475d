// ABOUTME: Core database management with embedded migrations for SQLite
// ABOUTME: Owns the connection pool and hands out per-entity managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

/// Best-effort activity log storage
pub mod activity_log;
/// Coach accounts and role flags
pub mod coaches;
/// Observation storage and cascade archiving
pub mod observations;
/// Organization storage
pub mod organizations;
/// Player Development Plan storage
pub mod pdps;
/// Player roster storage
pub mod players;
/// Team storage
pub mod teams;
/// Transaction guard with rollback-on-drop
pub mod transactions;

pub use activity_log::ActivityLogManager;
pub use coaches::{CoachFlagsUpdate, CoachesManager, CreateCoachRequest, UpdateCoachRequest};
pub use observations::{NewObservation, ObservationsManager, UpdateObservationRequest};
pub use organizations::OrganizationsManager;
pub use pdps::{NewPlan, PdpManager};
pub use players::{CreatePlayerRequest, ListPlayersFilter, PlayersManager, UpdatePlayerRequest};
pub use teams::{CreateTeamRequest, ListTeamsFilter, TeamsManager, UpdateTeamRequest};
pub use transactions::SqliteTransactionGuard;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// In-memory databases are pinned to a single long-lived connection so
    /// every query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(in_memory, "Database ready");
        Ok(db)
    }

    /// Run all pending migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database migration failed: {e}")))
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check connectivity with a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Organization manager
    #[must_use]
    pub fn organizations(&self) -> OrganizationsManager {
        OrganizationsManager::new(self.pool.clone())
    }

    /// Coach manager
    #[must_use]
    pub fn coaches(&self) -> CoachesManager {
        CoachesManager::new(self.pool.clone())
    }

    /// Team manager
    #[must_use]
    pub fn teams(&self) -> TeamsManager {
        TeamsManager::new(self.pool.clone())
    }

    /// Player manager
    #[must_use]
    pub fn players(&self) -> PlayersManager {
        PlayersManager::new(self.pool.clone())
    }

    /// Plan manager
    #[must_use]
    pub fn pdps(&self) -> PdpManager {
        PdpManager::new(self.pool.clone())
    }

    /// Observation manager
    #[must_use]
    pub fn observations(&self) -> ObservationsManager {
        ObservationsManager::new(self.pool.clone())
    }

    /// Activity log manager
    #[must_use]
    pub fn activity_log(&self) -> ActivityLogManager {
        ActivityLogManager::new(self.pool.clone())
    }
}

// ============================================================================
// Row decoding helpers
// ============================================================================

/// Parse a stored UUID column
pub(crate) fn parse_uuid(value: &str, column: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID in {column}: {e}")))
}

/// Parse an optional stored UUID column
pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> AppResult<Option<Uuid>> {
    value.as_deref().map(|v| parse_uuid(v, column)).transpose()
}

/// Parse a stored RFC 3339 timestamp
pub(crate) fn parse_timestamp(value: &str, column: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime in {column}: {e}")))
}

/// Parse an optional stored RFC 3339 timestamp
pub(crate) fn parse_optional_timestamp(
    value: Option<String>,
    column: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    value.as_deref().map(|v| parse_timestamp(v, column)).transpose()
}

/// Parse a stored calendar date (`YYYY-MM-DD`)
pub(crate) fn parse_date(value: &str, column: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::internal(format!("Invalid date in {column}: {e}")))
}

/// Clamp pagination values into `SQLite` integer binds
pub(crate) fn page_bounds(
    limit: Option<u32>,
    offset: Option<u32>,
    default_limit: u32,
) -> (i64, i64) {
    (
        i64::from(limit.unwrap_or(default_limit)),
        i64::from(offset.unwrap_or(0)),
    )
}

/// Trim a required text field, rejecting blank values
pub(crate) fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed.to_owned())
}
