// ABOUTME: Player record with display name, optional team, and organization scope
// ABOUTME: A player belongs to at most one team at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player tracked by coaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Given name, when captured separately
    pub first_name: Option<String>,
    /// Family name, when captured separately
    pub last_name: Option<String>,
    /// Current team, if assigned
    pub team_id: Option<Uuid>,
    /// Organization the player belongs to
    pub org_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Compose a display name from an explicit name or a first/last pair
    ///
    /// Returns `None` when every part is blank.
    #[must_use]
    pub fn compose_name(
        name: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Option<String> {
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            return Some(name.to_owned());
        }
        let parts: Vec<&str> = [first_name, last_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}
