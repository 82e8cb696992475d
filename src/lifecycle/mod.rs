// ABOUTME: Plan and observation workflows that span several tables
// ABOUTME: Enforces the one-active-plan rule and runs multi-step changes in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! Development plan lifecycle
//!
//! Each player is in one of two states: no active plan, or exactly one
//! active plan. Creating a plan moves a player into the active state;
//! archive-and-replace keeps them there with a fresh plan. Observations
//! always hang off the plan that was active when they were recorded and are
//! archived together with it.

/// Observation recording and maintenance
pub mod observations;
/// Plan creation, archiving, and replacement
pub mod pdp;

pub use observations::{CreateObservation, ObservationService};
pub use pdp::{ArchiveOutcome, PdpLifecycle, PlanState, ReplaceOutcome};
