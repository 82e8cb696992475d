// ABOUTME: Shared domain models for the Courtside player development service
// ABOUTME: Entity DTOs used by the database layer, workflows, and HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! # Courtside Core
//!
//! Canonical record types for organizations, coaches, teams, players,
//! player development plans and observations. The server crate re-exports
//! these so handlers and managers share one definition.

/// Entity records and their small helper enums
pub mod models;
