// ABOUTME: Player Development Plan record and its active/archived status
// ABOUTME: A plan with no archived_at is the player's current plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a plan, derived from `archived_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdpStatus {
    /// Current plan for the player
    Active,
    /// Superseded or explicitly archived
    Archived,
}

impl PdpStatus {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// A Player Development Plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pdp {
    /// Unique identifier
    pub id: Uuid,
    /// Player the plan belongs to
    pub player_id: Uuid,
    /// Coach who authored the plan
    pub coach_id: Option<Uuid>,
    /// Organization of the player at creation time
    pub org_id: String,
    /// Free-text plan content
    pub content: String,
    /// When the plan became active
    pub start_date: DateTime<Utc>,
    /// When the plan ended
    pub end_date: Option<DateTime<Utc>>,
    /// When the plan was archived (`None` while active)
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Pdp {
    /// Whether this is the player's current plan
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    /// Status derived from `archived_at`
    #[must_use]
    pub const fn status(&self) -> PdpStatus {
        if self.is_active() {
            PdpStatus::Active
        } else {
            PdpStatus::Archived
        }
    }
}
