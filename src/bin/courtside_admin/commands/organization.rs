// ABOUTME: Organization bootstrap command for courtside-admin
// ABOUTME: Refuses duplicate organization ids and prints the created record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use courtside_server::{database::Database, errors::AppResult};
use tracing::info;

/// Create an organization and print its identifier
pub async fn create(database: &Database, name: &str, id: Option<&str>) -> AppResult<()> {
    let org = database.organizations().create(id, name).await?;
    info!(org_id = %org.id, "Organization created");

    println!("Organization created");
    println!("  id:   {}", org.id);
    println!("  name: {}", org.name);
    Ok(())
}
