// ABOUTME: Subcommand implementations for courtside-admin
// ABOUTME: Each submodule implements one admin subcommand against the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

pub mod coach;
pub mod organization;
pub mod token;
