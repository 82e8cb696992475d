// ABOUTME: Coach bootstrap command for courtside-admin
// ABOUTME: Verifies the organization exists before linking the coach to it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use courtside_server::{
    database::{CreateCoachRequest, Database},
    errors::{AppError, AppResult},
    permissions::AccessProfile,
};
use tracing::info;

/// Create a coach and print the resolved role
pub async fn create(database: &Database, request: &CreateCoachRequest) -> AppResult<()> {
    if let Some(org_id) = request.org_id.as_deref() {
        if database.organizations().get(org_id).await?.is_none() {
            return Err(AppError::not_found(format!("Organization '{org_id}'")));
        }
    }

    let coach = database.coaches().create(request).await?;
    let access = AccessProfile::resolve(Some(&coach));
    info!(coach_id = %coach.id, role = %access.role, "Coach created");

    println!("Coach created");
    println!("  id:       {}", coach.id);
    println!("  name:     {}", coach.display_name());
    println!("  auth_uid: {}", coach.auth_uid);
    println!("  org:      {}", coach.org_id.as_deref().unwrap_or("(none)"));
    println!("  role:     {}", access.role);
    Ok(())
}
