// ABOUTME: Organization record, the tenant boundary for coaches, teams, and players
// ABOUTME: Organizations scope visibility only; they do not own rows physically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coaching organization (club, academy, school program)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Opaque organization identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
