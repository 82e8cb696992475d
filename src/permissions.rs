// ABOUTME: Role resolution and organization data scoping for coaches
// ABOUTME: Maps coach flags to coach/admin/superadmin and derives the query filter for each role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Role-based access
//!
//! A coach's role is derived from two flags with priority
//! `superadmin > admin > coach`. The role decides the [`DataScope`] applied
//! to every list query: superadmins see every organization, everyone else
//! sees only their own. Everything here is a pure function of the coach
//! record; a missing record degrades to the lowest privilege.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::models::Coach;

/// Effective role of a coach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachRole {
    /// Regular coach, scoped to their organization
    Coach,
    /// Organization administrator
    Admin,
    /// Platform-wide administrator
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl CoachRole {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coach => "coach",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Admin or superadmin
    #[must_use]
    pub const fn is_admin_or_higher(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl fmt::Display for CoachRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organization filter applied to queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataScope {
    /// No organization restriction
    Global,
    /// Restricted to one organization
    Organization(String),
    /// Matches nothing (non-superadmin without an organization)
    Empty,
}

impl DataScope {
    /// Scope for a coach record
    #[must_use]
    pub fn for_coach(coach: Option<&Coach>) -> Self {
        match (resolve_role(coach), coach.and_then(|c| c.org_id.as_deref())) {
            (CoachRole::SuperAdmin, _) => Self::Global,
            (_, Some(org_id)) => Self::Organization(org_id.to_owned()),
            (_, None) => Self::Empty,
        }
    }

    /// The filter as a JSON object: `{}` for global, `{"org_id": ...}` otherwise
    #[must_use]
    pub fn filter(&self) -> Map<String, Value> {
        let mut filter = Map::new();
        match self {
            Self::Global => {}
            Self::Organization(org_id) => {
                filter.insert("org_id".to_owned(), Value::String(org_id.clone()));
            }
            Self::Empty => {
                filter.insert("org_id".to_owned(), Value::Null);
            }
        }
        filter
    }

    /// Organization the scope is pinned to, if any
    #[must_use]
    pub fn org_id(&self) -> Option<&str> {
        match self {
            Self::Organization(org_id) => Some(org_id),
            Self::Global | Self::Empty => None,
        }
    }

    /// Whether a row in `org_id` is visible under this scope
    #[must_use]
    pub fn allows(&self, org_id: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Organization(own) => own == org_id,
            Self::Empty => false,
        }
    }

    /// Append ` AND <column> = ?` (or nothing / a false predicate) to a query
    pub fn push_filter(&self, builder: &mut QueryBuilder<'_, Sqlite>, column: &str) {
        match self {
            Self::Global => {}
            Self::Organization(org_id) => {
                builder
                    .push(" AND ")
                    .push(column)
                    .push(" = ")
                    .push_bind(org_id.clone());
            }
            Self::Empty => {
                builder.push(" AND 1 = 0");
            }
        }
    }
}

/// Role plus scope, resolved together from one coach record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessProfile {
    /// Effective role
    pub role: CoachRole,
    /// Query filter for the role
    pub scope: DataScope,
}

impl AccessProfile {
    /// Resolve role and scope for a coach record
    #[must_use]
    pub fn resolve(coach: Option<&Coach>) -> Self {
        Self {
            role: resolve_role(coach),
            scope: DataScope::for_coach(coach),
        }
    }
}

/// Effective role: superadmin > admin > coach
#[must_use]
pub fn resolve_role(coach: Option<&Coach>) -> CoachRole {
    match coach {
        Some(c) if c.is_superadmin => CoachRole::SuperAdmin,
        Some(c) if c.is_admin => CoachRole::Admin,
        _ => CoachRole::Coach,
    }
}

/// Admin or superadmin
#[must_use]
pub fn is_admin_or_higher(coach: Option<&Coach>) -> bool {
    resolve_role(coach).is_admin_or_higher()
}

/// Admins manage any team; coaches manage only the teams they own
#[must_use]
pub fn can_manage_team(coach: Option<&Coach>, team_coach_id: Option<Uuid>) -> bool {
    let Some(coach) = coach else {
        return false;
    };
    is_admin_or_higher(Some(coach)) || team_coach_id == Some(coach.id)
}

/// Administrators manage coaches of their own rank or below, never one that outranks them
#[must_use]
pub fn can_manage_coach(actor: Option<&Coach>, target: &Coach) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    let role = resolve_role(Some(actor));
    role.is_admin_or_higher() && resolve_role(Some(target)) <= role
}

/// Superadmins access every organization; others only their own
#[must_use]
pub fn can_access_org(coach: Option<&Coach>, org_id: &str) -> bool {
    match coach {
        Some(c) if c.is_superadmin => true,
        Some(c) => c.org_id.as_deref() == Some(org_id),
        None => false,
    }
}
