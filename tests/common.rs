// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, and org/coach/team/player fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines
)]
//! Shared test utilities for `courtside_server`

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use courtside_server::{
    config::{AuthConfig, CorsConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    context::CoachContext,
    database::{CreateCoachRequest, CreatePlayerRequest, Database},
    models::{Coach, Organization, Player, Team},
    resources::ServerResources,
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

pub const TEST_JWT_SECRET: &str = "courtside-test-secret-at-least-32-bytes-long";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh, migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:", 1).await?)
}

/// File-backed database for tests that need several pooled connections
pub async fn create_file_database(
    dir: &tempfile::TempDir,
    max_connections: u32,
) -> Result<Database> {
    init_test_logging();
    let path = dir.path().join("courtside-test.db");
    let url = format!("sqlite:{}", path.display());
    Ok(Database::new(&url, max_connections).await?)
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            jwt_audience: None,
            token_ttl_hours: 1,
        },
        logging: LoggingConfig::default(),
        cors: CorsConfig::default(),
    }
}

/// Server resources over a fresh in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        Arc::new(test_config()),
    )))
}

pub async fn create_test_org(database: &Database, name: &str) -> Result<Organization> {
    Ok(database.organizations().create(None, name).await?)
}

/// Coach flags for fixtures
#[derive(Debug, Clone, Copy, Default)]
pub struct CoachFlags {
    pub is_admin: bool,
    pub is_superadmin: bool,
}

pub const COACH: CoachFlags = CoachFlags {
    is_admin: false,
    is_superadmin: false,
};
pub const ADMIN: CoachFlags = CoachFlags {
    is_admin: true,
    is_superadmin: false,
};
pub const SUPERADMIN: CoachFlags = CoachFlags {
    is_admin: false,
    is_superadmin: true,
};

pub async fn create_test_coach(
    database: &Database,
    org_id: Option<&str>,
    flags: CoachFlags,
) -> Result<Coach> {
    let tag = Uuid::new_v4().simple().to_string();
    let request = CreateCoachRequest {
        auth_uid: format!("idp|{tag}"),
        email: format!("coach-{tag}@example.org"),
        first_name: "Test".to_owned(),
        last_name: "Coach".to_owned(),
        org_id: org_id.map(str::to_owned),
        is_admin: flags.is_admin,
        is_superadmin: flags.is_superadmin,
    };
    Ok(database.coaches().create(&request).await?)
}

pub async fn create_test_team(database: &Database, coach: &Coach, name: &str) -> Result<Team> {
    let org_id = coach
        .org_id
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("coach has no organization"))?;
    Ok(database.teams().create(coach.id, org_id, name).await?)
}

pub async fn create_test_player(
    database: &Database,
    org_id: &str,
    team_id: Option<Uuid>,
    name: &str,
) -> Result<Player> {
    let request = CreatePlayerRequest {
        name: Some(name.to_owned()),
        first_name: None,
        last_name: None,
        team_id,
        org_id: None,
    };
    Ok(database.players().create(org_id, &request).await?)
}

/// A complete organization: admin, coach with a team, and one player on it
pub struct TestRoster {
    pub org: Organization,
    pub admin: Coach,
    pub coach: Coach,
    pub team: Team,
    pub player: Player,
}

impl TestRoster {
    pub fn coach_ctx(&self) -> CoachContext {
        CoachContext::new(self.coach.clone())
    }

    pub fn admin_ctx(&self) -> CoachContext {
        CoachContext::new(self.admin.clone())
    }
}

pub async fn create_test_roster(database: &Database, org_name: &str) -> Result<TestRoster> {
    let org = create_test_org(database, org_name).await?;
    let admin = create_test_coach(database, Some(&org.id), ADMIN).await?;
    let coach = create_test_coach(database, Some(&org.id), COACH).await?;
    let team = create_test_team(database, &coach, "U12 Blue").await?;
    let player = create_test_player(database, &org.id, Some(team.id), "Jordan Avery").await?;
    Ok(TestRoster {
        org,
        admin,
        coach,
        team,
        player,
    })
}

/// `Authorization` header value for a coach
pub fn bearer_for(resources: &ServerResources, coach: &Coach) -> String {
    let token = resources
        .auth_manager
        .generate_token(&coach.auth_uid, Some(&coach.email))
        .unwrap();
    format!("Bearer {token}")
}
