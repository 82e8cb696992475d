// ABOUTME: Integration tests for the HTTP API through the fully layered router
// ABOUTME: Tests session redirects, auth failures, scoping, and plan/observation status mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::{http::StatusCode, Router};
use common::{
    bearer_for, create_test_coach, create_test_org, create_test_roster,
    create_test_server_resources, TestRoster, ADMIN, COACH, SUPERADMIN,
};
use courtside_server::{resources::ServerResources, server::build_router};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

// ============================================================================
// Test Helpers
// ============================================================================

async fn setup_test_environment() -> (Arc<ServerResources>, Router, TestRoster) {
    let resources = create_test_server_resources().await.unwrap();
    let roster = create_test_roster(&resources.database, "Riverside")
        .await
        .unwrap();
    let router = build_router(&resources);
    (resources, router, roster)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_ready() {
    let (_resources, router, _roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/health").send(router.clone()).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");

    let response = AxumTestRequest::get("/ready").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (_resources, router, _roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "req-123")
        .send(router.clone())
        .await;
    assert_eq!(response.header("x-request-id"), Some("req-123"));

    let response = AxumTestRequest::get("/health").send(router).await;
    assert!(response.header("x-request-id").is_some());
}

// ============================================================================
// Session and onboarding
// ============================================================================

#[tokio::test]
async fn test_session_without_credentials_redirects_to_login() {
    let (_resources, router, _roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/session").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["redirect_to"], "/login");
}

#[tokio::test]
async fn test_session_with_team_goes_to_dashboard() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["redirect_to"], "/dashboard");
    assert_eq!(body["role"], "coach");
    assert_eq!(body["data_filter"], json!({ "org_id": roster.org.id }));
}

#[tokio::test]
async fn test_session_accepts_auth_cookie() {
    let (resources, router, roster) = setup_test_environment().await;
    let token = resources
        .auth_manager
        .generate_token(&roster.admin.auth_uid, None)
        .unwrap();

    let response = AxumTestRequest::get("/api/session")
        .header("cookie", &format!("theme=dark; auth_token={token}"))
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_onboarding_flow() {
    let (resources, router, _roster) = setup_test_environment().await;
    let org = create_test_org(&resources.database, "Lakeside").await.unwrap();
    let newcomer = create_test_coach(&resources.database, Some(&org.id), COACH)
        .await
        .unwrap();
    let auth = bearer_for(&resources, &newcomer);

    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    let body: Value = response.json();
    assert_eq!(body["redirect_to"], "/onboarding");

    let response = AxumTestRequest::post("/api/onboarding")
        .header("authorization", &auth)
        .json(&json!({ "team_name": "Lakeside U10" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["team"]["name"], "Lakeside U10");
    assert_eq!(body["redirect_to"], "/dashboard");

    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &auth)
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["redirect_to"], "/dashboard");
}

#[tokio::test]
async fn test_superadmin_without_org_lands_on_dashboard() {
    let (resources, router, _roster) = setup_test_environment().await;
    let superadmin = create_test_coach(&resources.database, None, SUPERADMIN)
        .await
        .unwrap();

    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &bearer_for(&resources, &superadmin))
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["redirect_to"], "/dashboard");
    assert_eq!(body["data_filter"], json!({}));
}

#[tokio::test]
async fn test_coach_without_org_awaits_assignment() {
    let (resources, router, _roster) = setup_test_environment().await;
    let unassigned = create_test_coach(&resources.database, None, COACH)
        .await
        .unwrap();
    let auth = bearer_for(&resources, &unassigned);

    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["redirect_to"], "/pending-organization");
    assert_eq!(body["data_filter"], json!({ "org_id": null }));

    // Team onboarding is not offered until an organization is assigned
    let response = AxumTestRequest::post("/api/onboarding")
        .header("authorization", &auth)
        .json(&json!({ "team_name": "U10 Red" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

// ============================================================================
// Authentication failures
// ============================================================================

#[tokio::test]
async fn test_missing_credentials_is_unauthorized() {
    let (_resources, router, _roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/players").send(router).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (_resources, router, _roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/players")
        .header("authorization", "Bearer not-a-jwt")
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "AUTH_INVALID");
}

#[tokio::test]
async fn test_identity_without_coach_record() {
    let (resources, router, _roster) = setup_test_environment().await;
    let token = resources
        .auth_manager
        .generate_token("idp|stranger", None)
        .unwrap();

    let response = AxumTestRequest::get("/api/coaches/me")
        .header("authorization", &format!("Bearer {token}"))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Coach record not found");
}

// ============================================================================
// Coaches
// ============================================================================

#[tokio::test]
async fn test_me_reports_role_and_filter() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/coaches/me")
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["role"], "admin");
    assert_eq!(body["coach"]["id"], json!(roster.admin.id));
    assert_eq!(body["data_filter"], json!({ "org_id": roster.org.id }));
}

#[tokio::test]
async fn test_coach_cannot_change_flags() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::put(&format!("/api/coaches/{}/flags", roster.coach.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "is_admin": true }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = AxumTestRequest::put(&format!("/api/coaches/{}/flags", roster.coach.id))
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .json(&json!({ "is_superadmin": true }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = AxumTestRequest::put(&format!("/api/coaches/{}/flags", roster.coach.id))
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .json(&json!({ "is_admin": true }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["is_admin"], true);
}

#[tokio::test]
async fn test_admin_cannot_deactivate_or_delete_superadmin() {
    let (resources, router, roster) = setup_test_environment().await;
    let superadmin = create_test_coach(&resources.database, Some(&roster.org.id), SUPERADMIN)
        .await
        .unwrap();
    let admin_auth = bearer_for(&resources, &roster.admin);

    let response = AxumTestRequest::put(&format!("/api/coaches/{}/flags", superadmin.id))
        .header("authorization", &admin_auth)
        .json(&json!({ "active": false }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "PERMISSION_DENIED");

    let response = AxumTestRequest::delete(&format!("/api/coaches/{}", superadmin.id))
        .header("authorization", &admin_auth)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // The superadmin still signs in normally
    let response = AxumTestRequest::get("/api/session")
        .header("authorization", &bearer_for(&resources, &superadmin))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["role"], "superadmin");

    // Peers of equal rank remain manageable
    let other_admin = create_test_coach(&resources.database, Some(&roster.org.id), ADMIN)
        .await
        .unwrap();
    let response = AxumTestRequest::put(&format!("/api/coaches/{}/flags", other_admin.id))
        .header("authorization", &admin_auth)
        .json(&json!({ "active": false }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["active"], false);
}

// ============================================================================
// Roster scoping
// ============================================================================

#[tokio::test]
async fn test_other_org_player_is_not_found() {
    let (resources, router, roster) = setup_test_environment().await;
    let other = create_test_roster(&resources.database, "Hillcrest")
        .await
        .unwrap();

    let response = AxumTestRequest::get(&format!("/api/players/{}", other.player.id))
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::get("/api/players")
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["players"][0]["id"], json!(roster.player.id));
}

#[tokio::test]
async fn test_coach_cannot_rename_someone_elses_team() {
    let (resources, router, roster) = setup_test_environment().await;
    let colleague = create_test_coach(&resources.database, Some(&roster.org.id), COACH)
        .await
        .unwrap();

    let response = AxumTestRequest::put(&format!("/api/teams/{}", roster.team.id))
        .header("authorization", &bearer_for(&resources, &colleague))
        .json(&json!({ "name": "Renamed" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = AxumTestRequest::put(&format!("/api/teams/{}", roster.team.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "name": "Renamed" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/players/not-a-uuid")
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Plans and observations
// ============================================================================

#[tokio::test]
async fn test_observation_before_plan_is_unprocessable() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::post(&format!("/api/players/{}/observations", roster.player.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "content": "Strong rebounding" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "NO_ACTIVE_PLAN");
    assert_eq!(body["error"]["retryable"], false);
}

#[tokio::test]
async fn test_plan_workflow_over_http() {
    let (resources, router, roster) = setup_test_environment().await;
    let auth = bearer_for(&resources, &roster.coach);
    let player_path = format!("/api/players/{}", roster.player.id);

    let response = AxumTestRequest::get(&format!("{player_path}/pdps/active"))
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    let body: Value = response.json();
    assert_eq!(body["state"], "no_active_plan");

    let response = AxumTestRequest::post(&format!("{player_path}/pdps"))
        .header("authorization", &auth)
        .json(&json!({ "content": "Plan A" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let plan_a: Value = response.json();

    let response = AxumTestRequest::post(&format!("{player_path}/pdps"))
        .header("authorization", &auth)
        .json(&json!({ "content": "Plan A again" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = AxumTestRequest::post(&format!("{player_path}/observations"))
        .header("authorization", &auth)
        .json(&json!({ "content": "Sprinted back on defense", "observation_date": "2025-03-01" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let observation: Value = response.json();
    assert_eq!(observation["pdp_id"], plan_a["id"]);
    assert_eq!(observation["observation_date"], "2025-03-01");

    // Stale expectation is rejected as a retryable conflict
    let response = AxumTestRequest::post(&format!("{player_path}/pdps/replace"))
        .header("authorization", &auth)
        .json(&json!({ "content": "Plan B", "expected_pdp_id": uuid::Uuid::new_v4() }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "RESOURCE_CONFLICT");
    assert_eq!(body["error"]["retryable"], true);

    let response = AxumTestRequest::post(&format!("{player_path}/pdps/replace"))
        .header("authorization", &auth)
        .json(&json!({ "content": "Plan B", "expected_pdp_id": plan_a["id"] }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let outcome: Value = response.json();
    assert_eq!(outcome["observations_archived"], 1);
    assert_eq!(outcome["archived"]["id"], plan_a["id"]);
    assert_eq!(outcome["active"]["content"], "Plan B");
    assert_eq!(outcome["archived"]["archived_at"], outcome["active"]["start_date"]);

    let response = AxumTestRequest::get(&format!("{player_path}/overview"))
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let overview: Value = response.json();
    assert_eq!(overview["plan"]["state"], "active_plan");
    assert_eq!(overview["plan"]["plan"]["id"], outcome["active"]["id"]);
    assert_eq!(overview["observations"], json!([]));
    assert_eq!(overview["archived_plan_count"], 1);

    let response = AxumTestRequest::get(&format!(
        "{player_path}/observations?include_archived=true"
    ))
    .header("authorization", &auth)
    .send(router.clone())
    .await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["observations"][0]["archived"], true);

    let response = AxumTestRequest::get(&format!("{player_path}/pdps"))
        .header("authorization", &auth)
        .send(router)
        .await;
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["pdps"][0]["id"], outcome["active"]["id"]);
}

#[tokio::test]
async fn test_replace_without_plan_is_unprocessable() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::post(&format!("/api/players/{}/pdps/replace", roster.player.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "content": "Plan B" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_blank_plan_content_is_bad_request() {
    let (resources, router, roster) = setup_test_environment().await;

    let response = AxumTestRequest::post(&format!("/api/players/{}/pdps", roster.player.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "content": "  " }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "MISSING_REQUIRED_FIELD");
}

// ============================================================================
// Activity feed
// ============================================================================

#[tokio::test]
async fn test_activity_feed_requires_admin() {
    let (resources, router, roster) = setup_test_environment().await;

    AxumTestRequest::post(&format!("/api/players/{}/pdps", roster.player.id))
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .json(&json!({ "content": "Plan A" }))
        .send(router.clone())
        .await;

    let response = AxumTestRequest::get("/api/activity")
        .header("authorization", &bearer_for(&resources, &roster.coach))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = AxumTestRequest::get("/api/activity?limit=5")
        .header("authorization", &bearer_for(&resources, &roster.admin))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["entries"][0]["action"], "plan_created");
}

#[tokio::test]
async fn test_only_superadmin_creates_organizations() {
    let (resources, router, roster) = setup_test_environment().await;
    let superadmin = create_test_coach(&resources.database, None, SUPERADMIN)
        .await
        .unwrap();
    let admin = create_test_coach(&resources.database, Some(&roster.org.id), ADMIN)
        .await
        .unwrap();

    let response = AxumTestRequest::post("/api/organizations")
        .header("authorization", &bearer_for(&resources, &admin))
        .json(&json!({ "name": "Eastside" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = AxumTestRequest::post("/api/organizations")
        .header("authorization", &bearer_for(&resources, &superadmin))
        .json(&json!({ "name": "Eastside" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}
