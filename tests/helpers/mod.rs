// ABOUTME: Test helper modules shared by route integration tests
// ABOUTME: Request builders for driving routers without a listening socket
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching
#![allow(dead_code)]

pub mod axum_test;
