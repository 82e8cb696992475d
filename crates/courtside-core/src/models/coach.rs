// ABOUTME: Coach record linking an external identity to an organization and role flags
// ABOUTME: Role flags default to false when absent so malformed records get the lowest role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coach account
///
/// Exactly one coach exists per external identity (`auth_uid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    /// Unique identifier
    pub id: Uuid,
    /// Identifier issued by the external identity provider
    pub auth_uid: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Organization administrator
    #[serde(default)]
    pub is_admin: bool,
    /// Platform-wide administrator
    #[serde(default)]
    pub is_superadmin: bool,
    /// Whether the account may sign in
    #[serde(default = "default_active")]
    pub active: bool,
    /// Organization the coach belongs to
    #[serde(default)]
    pub org_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl Coach {
    /// Display name built from first and last name, falling back to the email
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_owned()
        }
    }
}
