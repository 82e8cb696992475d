// ABOUTME: Observation record, a dated coaching note tied to a player and their plan
// ABOUTME: Observations hang off a plan and are archived together with it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coaching observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier
    pub id: Uuid,
    /// Player the observation is about
    pub player_id: Uuid,
    /// Plan that was active when the observation was recorded
    pub pdp_id: Option<Uuid>,
    /// Coach who recorded it
    pub coach_id: Option<Uuid>,
    /// Organization of the player
    pub org_id: String,
    /// Free-text note
    pub content: String,
    /// Calendar date the observation refers to
    pub observation_date: NaiveDate,
    /// Whether the observation has been archived
    pub archived: bool,
    /// When it was archived
    pub archived_at: Option<DateTime<Utc>>,
    /// Coach who archived it
    pub archived_by: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
