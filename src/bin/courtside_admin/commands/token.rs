// ABOUTME: Token issuing command for local development and scripted clients
// ABOUTME: Signs with the server secret from the environment so the API accepts the token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use courtside_server::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    errors::{AppError, AppResult},
};

/// Sign a bearer token for an existing coach
pub async fn issue(database: &Database, auth_uid: &str) -> AppResult<()> {
    let config = ServerConfig::from_env()?;
    let coach = database
        .coaches()
        .get_by_auth_uid(auth_uid)
        .await?
        .ok_or_else(|| AppError::not_found("Coach record"))?;

    let auth = AuthManager::from_config(&config.auth);
    let token = auth.generate_token(&coach.auth_uid, Some(&coach.email))?;

    println!("{token}");
    Ok(())
}
