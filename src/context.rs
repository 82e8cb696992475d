// ABOUTME: Per-request coach context resolved from an authenticated identity
// ABOUTME: Carries the coach record with its role and data scope, plus authorization guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Coach;
use crate::permissions::{
    can_access_org, can_manage_coach, can_manage_team, AccessProfile, CoachRole, DataScope,
};

/// The signed-in coach for the duration of one request
#[derive(Debug, Clone)]
pub struct CoachContext {
    /// Coach record
    pub coach: Coach,
    /// Role and data scope derived from the record
    pub access: AccessProfile,
}

impl CoachContext {
    /// Build a context from a coach record
    #[must_use]
    pub fn new(coach: Coach) -> Self {
        let access = AccessProfile::resolve(Some(&coach));
        Self { coach, access }
    }

    /// Load the coach behind an authenticated identity
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` ("Coach record not found") if the identity
    /// has no coach row, and `PermissionDenied` if the coach is deactivated
    pub async fn resolve(database: &Database, auth_uid: &str) -> AppResult<Self> {
        let coach = database
            .coaches()
            .get_by_auth_uid(auth_uid)
            .await?
            .ok_or_else(|| AppError::not_found("Coach record"))?;

        if !coach.active {
            return Err(AppError::permission_denied("Coach account is deactivated"));
        }

        Ok(Self::new(coach))
    }

    /// Effective role
    #[must_use]
    pub const fn role(&self) -> CoachRole {
        self.access.role
    }

    /// Query filter for this coach
    #[must_use]
    pub const fn scope(&self) -> &DataScope {
        &self.access.scope
    }

    /// Coach identifier
    #[must_use]
    pub const fn coach_id(&self) -> Uuid {
        self.coach.id
    }

    /// Organization the coach belongs to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the coach has not joined an organization
    pub fn org_id(&self) -> AppResult<&str> {
        self.coach
            .org_id
            .as_deref()
            .ok_or_else(|| AppError::invalid_input("Coach is not a member of an organization"))
    }

    /// Require admin or superadmin
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for regular coaches
    pub fn require_admin(&self) -> AppResult<()> {
        if self.role().is_admin_or_higher() {
            Ok(())
        } else {
            Err(AppError::permission_denied("Administrator role required"))
        }
    }

    /// Require superadmin
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` unless the coach is a superadmin
    pub fn require_superadmin(&self) -> AppResult<()> {
        if self.role() == CoachRole::SuperAdmin {
            Ok(())
        } else {
            Err(AppError::permission_denied("Superadmin role required"))
        }
    }

    /// Require access to an organization's data
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the organization is outside the coach's reach
    pub fn require_org_access(&self, org_id: &str) -> AppResult<()> {
        if can_access_org(Some(&self.coach), org_id) {
            Ok(())
        } else {
            Err(AppError::permission_denied(
                "Not allowed to modify data in this organization",
            ))
        }
    }

    /// Require permission to manage a team
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` unless the coach owns the team or is an admin
    pub fn require_team_manager(&self, team_coach_id: Option<Uuid>) -> AppResult<()> {
        if can_manage_team(Some(&self.coach), team_coach_id) {
            Ok(())
        } else {
            Err(AppError::permission_denied(
                "Only the team's coach or an administrator may change it",
            ))
        }
    }

    /// Require permission to change or remove another coach
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` unless the coach is an admin whose role is
    /// not outranked by the target's
    pub fn require_coach_manager(&self, target: &Coach) -> AppResult<()> {
        if can_manage_coach(Some(&self.coach), target) {
            Ok(())
        } else {
            Err(AppError::permission_denied("Cannot change a coach with a higher role"))
        }
    }
}
