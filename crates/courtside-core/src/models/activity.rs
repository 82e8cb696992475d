// ABOUTME: Activity log entry types recording coach actions on players, plans, and teams
// ABOUTME: ActivityAction and ActivityLogEntry DTOs with builder helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of actions written to the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    // Plans
    /// A plan was created for a player with no active plan
    PlanCreated,
    /// A plan's content was edited
    PlanUpdated,
    /// A plan was archived without a successor
    PlanArchived,
    /// A plan was archived and replaced by a new one
    PlanReplaced,

    // Observations
    /// An observation was recorded
    ObservationCreated,
    /// An observation was archived individually
    ObservationArchived,
    /// An observation was deleted
    ObservationDeleted,

    // Roster
    /// A player was added
    PlayerCreated,
    /// A player was renamed or moved
    PlayerUpdated,
    /// A player was removed
    PlayerDeleted,
    /// A team was created
    TeamCreated,
    /// A team was renamed or reassigned
    TeamUpdated,
    /// A team was removed
    TeamDeleted,

    // Administration
    /// A coach profile or role flags changed
    CoachUpdated,
    /// A coach was removed
    CoachDeleted,
    /// An organization was created
    OrganizationCreated,
}

impl ActivityAction {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PlanCreated => "plan_created",
            Self::PlanUpdated => "plan_updated",
            Self::PlanArchived => "plan_archived",
            Self::PlanReplaced => "plan_replaced",
            Self::ObservationCreated => "observation_created",
            Self::ObservationArchived => "observation_archived",
            Self::ObservationDeleted => "observation_deleted",
            Self::PlayerCreated => "player_created",
            Self::PlayerUpdated => "player_updated",
            Self::PlayerDeleted => "player_deleted",
            Self::TeamCreated => "team_created",
            Self::TeamUpdated => "team_updated",
            Self::TeamDeleted => "team_deleted",
            Self::CoachUpdated => "coach_updated",
            Self::CoachDeleted => "coach_deleted",
            Self::OrganizationCreated => "organization_created",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let action = match s {
            "plan_created" => Self::PlanCreated,
            "plan_updated" => Self::PlanUpdated,
            "plan_archived" => Self::PlanArchived,
            "plan_replaced" => Self::PlanReplaced,
            "observation_created" => Self::ObservationCreated,
            "observation_archived" => Self::ObservationArchived,
            "observation_deleted" => Self::ObservationDeleted,
            "player_created" => Self::PlayerCreated,
            "player_updated" => Self::PlayerUpdated,
            "player_deleted" => Self::PlayerDeleted,
            "team_created" => Self::TeamCreated,
            "team_updated" => Self::TeamUpdated,
            "team_deleted" => Self::TeamDeleted,
            "coach_updated" => Self::CoachUpdated,
            "coach_deleted" => Self::CoachDeleted,
            "organization_created" => Self::OrganizationCreated,
            _ => return None,
        };
        Some(action)
    }

    /// Entity type the action applies to
    #[must_use]
    pub const fn entity_type(&self) -> &'static str {
        match self {
            Self::PlanCreated | Self::PlanUpdated | Self::PlanArchived | Self::PlanReplaced => {
                "pdp"
            }
            Self::ObservationCreated | Self::ObservationArchived | Self::ObservationDeleted => {
                "observation"
            }
            Self::PlayerCreated | Self::PlayerUpdated | Self::PlayerDeleted => "player",
            Self::TeamCreated | Self::TeamUpdated | Self::TeamDeleted => "team",
            Self::CoachUpdated | Self::CoachDeleted => "coach",
            Self::OrganizationCreated => "organization",
        }
    }
}

/// A row in the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Unique entry identifier
    pub id: Uuid,
    /// Coach who performed the action
    pub coach_id: Option<Uuid>,
    /// Organization the action happened in
    pub org_id: Option<String>,
    /// What happened
    pub action: ActivityAction,
    /// Kind of entity affected (e.g. "pdp", "player")
    pub entity_type: String,
    /// Identifier of the affected entity
    pub entity_id: Option<String>,
    /// Additional structured details
    pub details: serde_json::Value,
    /// When the action happened
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Create a new entry for an action
    #[must_use]
    pub fn new(action: ActivityAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            coach_id: None,
            org_id: None,
            action,
            entity_type: action.entity_type().to_owned(),
            entity_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
            created_at: Utc::now(),
        }
    }

    /// Set the acting coach
    #[must_use]
    pub const fn with_coach(mut self, coach_id: Uuid) -> Self {
        self.coach_id = Some(coach_id);
        self
    }

    /// Set the organization
    #[must_use]
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Set the affected entity
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl ToString) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}
