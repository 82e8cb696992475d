// ABOUTME: Team record owned by a coach inside an organization
// ABOUTME: A team belongs to one organization and optionally one owning coach
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team of players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: Uuid,
    /// Team name
    pub name: String,
    /// Owning coach (cleared if the coach is deleted)
    pub coach_id: Option<Uuid>,
    /// Organization the team belongs to
    pub org_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
