// ABOUTME: Integration tests for the organization, coach, team, player, and activity log managers
// ABOUTME: Exercises scoped reads, roster moves, cascades, and write-error mapping against SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    create_test_coach, create_test_database, create_test_org, create_test_player,
    create_test_roster, create_test_team, ADMIN, COACH,
};
use courtside_server::{
    database::{
        CoachFlagsUpdate, CreateCoachRequest, ListPlayersFilter, ListTeamsFilter,
        UpdateCoachRequest, UpdatePlayerRequest, UpdateTeamRequest,
    },
    errors::ErrorCode,
    lifecycle::{CreateObservation, ObservationService, PdpLifecycle},
    models::{ActivityAction, ActivityLogEntry},
    permissions::DataScope,
};

fn org_scope(org_id: &str) -> DataScope {
    DataScope::Organization(org_id.to_owned())
}

// ============================================================================
// Organizations
// ============================================================================

#[tokio::test]
async fn test_organization_create_and_scope() {
    let database = create_test_database().await.unwrap();
    let riverside = database
        .organizations()
        .create(Some("riverside"), "Riverside Youth")
        .await
        .unwrap();
    create_test_org(&database, "Hillcrest").await.unwrap();

    assert_eq!(riverside.id, "riverside");
    assert_eq!(
        database.organizations().list(&DataScope::Global).await.unwrap().len(),
        2
    );
    let scoped = database
        .organizations()
        .list(&org_scope("riverside"))
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "Riverside Youth");
    assert!(database
        .organizations()
        .list(&DataScope::Empty)
        .await
        .unwrap()
        .is_empty());

    let err = database
        .organizations()
        .create(Some("riverside"), "Duplicate")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceConflict);
}

// ============================================================================
// Coaches
// ============================================================================

#[tokio::test]
async fn test_coach_lookup_and_duplicate_identity() {
    let database = create_test_database().await.unwrap();
    let org = create_test_org(&database, "Riverside").await.unwrap();
    let coach = create_test_coach(&database, Some(&org.id), COACH).await.unwrap();

    let found = database
        .coaches()
        .get_by_auth_uid(&coach.auth_uid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, coach);
    assert!(database
        .coaches()
        .get_by_auth_uid("idp|nobody")
        .await
        .unwrap()
        .is_none());

    let err = database
        .coaches()
        .create(&CreateCoachRequest {
            auth_uid: coach.auth_uid.clone(),
            email: "other@example.org".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            org_id: None,
            is_admin: false,
            is_superadmin: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceConflict);
}

#[tokio::test]
async fn test_coach_unknown_org_is_invalid_input() {
    let database = create_test_database().await.unwrap();
    let err = create_test_coach(&database, Some("does-not-exist"), COACH)
        .await
        .unwrap_err();
    let err = err.downcast::<courtside_server::errors::AppError>().unwrap();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_coach_null_flags_read_as_false() {
    let database = create_test_database().await.unwrap();
    let org = create_test_org(&database, "Riverside").await.unwrap();
    let coach = create_test_coach(&database, Some(&org.id), ADMIN).await.unwrap();

    sqlx::query("UPDATE coaches SET is_admin = NULL, is_superadmin = NULL WHERE id = $1")
        .bind(coach.id.to_string())
        .execute(database.pool())
        .await
        .unwrap();

    let reloaded = database
        .coaches()
        .get(coach.id, &DataScope::Global)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.is_admin);
    assert!(!reloaded.is_superadmin);
}

#[tokio::test]
async fn test_coach_profile_flags_and_deactivation() {
    let database = create_test_database().await.unwrap();
    let org = create_test_org(&database, "Riverside").await.unwrap();
    let coach = create_test_coach(&database, Some(&org.id), COACH).await.unwrap();

    let updated = database
        .coaches()
        .update_profile(
            coach.id,
            &UpdateCoachRequest {
                first_name: Some("Robin".to_owned()),
                last_name: None,
                email: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Robin");
    assert_eq!(updated.last_name, coach.last_name);

    let promoted = database
        .coaches()
        .update_flags(
            coach.id,
            &CoachFlagsUpdate {
                is_admin: Some(true),
                ..CoachFlagsUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(promoted.is_admin);
    assert!(!promoted.is_superadmin);

    let deactivated = database.coaches().deactivate(coach.id).await.unwrap();
    assert!(!deactivated.active);
}

#[tokio::test]
async fn test_coach_list_and_delete_respect_scope() {
    let database = create_test_database().await.unwrap();
    let riverside = create_test_roster(&database, "Riverside").await.unwrap();
    let hillcrest = create_test_roster(&database, "Hillcrest").await.unwrap();

    let listed = database
        .coaches()
        .list(&org_scope(&riverside.org.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c.org_id.as_deref() == Some(riverside.org.id.as_str())));

    // Out-of-scope delete is a no-op
    assert!(!database
        .coaches()
        .delete(hillcrest.coach.id, &org_scope(&riverside.org.id))
        .await
        .unwrap());

    // Deleting a team owner keeps the team with no owner
    assert!(database
        .coaches()
        .delete(riverside.coach.id, &org_scope(&riverside.org.id))
        .await
        .unwrap());
    let team = database
        .teams()
        .get(riverside.team.id, &DataScope::Global)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(team.coach_id, None);
}

// ============================================================================
// Teams
// ============================================================================

#[tokio::test]
async fn test_team_listing_and_owner_filter() {
    let database = create_test_database().await.unwrap();
    let roster = create_test_roster(&database, "Riverside").await.unwrap();
    create_test_team(&database, &roster.admin, "U14 Red").await.unwrap();

    let all = database
        .teams()
        .list(&org_scope(&roster.org.id), &ListTeamsFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let mine = database
        .teams()
        .list(
            &org_scope(&roster.org.id),
            &ListTeamsFilter {
                coach_id: Some(roster.coach.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, roster.team.id);

    assert_eq!(database.teams().count_for_org(&roster.org.id).await.unwrap(), 2);
    assert!(database
        .teams()
        .list(&org_scope("elsewhere"), &ListTeamsFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_team_rename_and_delete_unassigns_players() {
    let database = create_test_database().await.unwrap();
    let roster = create_test_roster(&database, "Riverside").await.unwrap();

    let renamed = database
        .teams()
        .update(
            roster.team.id,
            &UpdateTeamRequest {
                name: Some("U12 Gold".to_owned()),
                coach_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "U12 Gold");
    assert_eq!(renamed.coach_id, Some(roster.coach.id));

    assert!(database.teams().delete(roster.team.id).await.unwrap());
    let player = database
        .players()
        .get(roster.player.id, &DataScope::Global)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(player.team_id, None);
}

// ============================================================================
// Players
// ============================================================================

#[tokio::test]
async fn test_player_roster_filters() {
    let database = create_test_database().await.unwrap();
    let roster = create_test_roster(&database, "Riverside").await.unwrap();
    create_test_player(&database, &roster.org.id, None, "Alex Unassigned")
        .await
        .unwrap();

    let scope = org_scope(&roster.org.id);
    let all = database
        .players()
        .list(&scope, &ListPlayersFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Ordered by name
    assert_eq!(all[0].name, "Alex Unassigned");

    let on_team = database
        .players()
        .list(
            &scope,
            &ListPlayersFilter {
                team_id: Some(roster.team.id),
                ..ListPlayersFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(on_team.len(), 1);
    assert_eq!(on_team[0].id, roster.player.id);

    let unassigned = database
        .players()
        .list(
            &scope,
            &ListPlayersFilter {
                unassigned_only: true,
                ..ListPlayersFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].team_id, None);

    let page = database
        .players()
        .list(
            &scope,
            &ListPlayersFilter {
                limit: Some(1),
                offset: Some(1),
                ..ListPlayersFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, roster.player.id);
}

#[tokio::test]
async fn test_player_cannot_join_team_in_other_org() {
    let database = create_test_database().await.unwrap();
    let riverside = create_test_roster(&database, "Riverside").await.unwrap();
    let hillcrest = create_test_roster(&database, "Hillcrest").await.unwrap();

    let err = database
        .players()
        .update(
            &riverside.player,
            &UpdatePlayerRequest {
                team_id: Some(hillcrest.team.id),
                ..UpdatePlayerRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let cleared = database
        .players()
        .update(
            &riverside.player,
            &UpdatePlayerRequest {
                clear_team: true,
                ..UpdatePlayerRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.team_id, None);
    assert_eq!(cleared.name, riverside.player.name);
}

#[tokio::test]
async fn test_player_delete_cascades_plans_and_observations() {
    let database = create_test_database().await.unwrap();
    let roster = create_test_roster(&database, "Riverside").await.unwrap();
    let ctx = roster.coach_ctx();

    PdpLifecycle::new(&database)
        .create_plan(&ctx, roster.player.id, "Plan A")
        .await
        .unwrap();
    ObservationService::new(&database)
        .create_observation(
            &ctx,
            roster.player.id,
            &CreateObservation {
                content: "Great effort".to_owned(),
                observation_date: None,
            },
        )
        .await
        .unwrap();

    assert!(database.players().delete(roster.player.id).await.unwrap());

    let plans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pdp")
        .fetch_one(database.pool())
        .await
        .unwrap();
    let observations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM observations")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(plans, 0);
    assert_eq!(observations, 0);
}

// ============================================================================
// Activity log
// ============================================================================

#[tokio::test]
async fn test_activity_log_scoped_newest_first() {
    let database = create_test_database().await.unwrap();
    let riverside = create_test_roster(&database, "Riverside").await.unwrap();
    let hillcrest = create_test_roster(&database, "Hillcrest").await.unwrap();
    let log = database.activity_log();

    let first = ActivityLogEntry::new(ActivityAction::TeamCreated)
        .with_coach(riverside.coach.id)
        .with_org(riverside.org.id.clone())
        .with_entity(riverside.team.id);
    let mut second = ActivityLogEntry::new(ActivityAction::PlayerCreated)
        .with_coach(riverside.coach.id)
        .with_org(riverside.org.id.clone())
        .with_entity(riverside.player.id);
    second.created_at = first.created_at + chrono::Duration::seconds(1);
    let elsewhere = ActivityLogEntry::new(ActivityAction::TeamCreated)
        .with_org(hillcrest.org.id.clone())
        .with_entity(hillcrest.team.id);

    log.record(&first).await.unwrap();
    log.record(&second).await.unwrap();
    log.record(&elsewhere).await.unwrap();

    let entries = log.list_recent(&org_scope(&riverside.org.id), 10).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, ActivityAction::PlayerCreated);
    assert_eq!(entries[0].entity_type, "player");
    assert_eq!(entries[1].action, ActivityAction::TeamCreated);

    assert_eq!(log.list_recent(&DataScope::Global, 10).await.unwrap().len(), 3);
    assert_eq!(log.list_recent(&DataScope::Global, 1).await.unwrap().len(), 1);
}
