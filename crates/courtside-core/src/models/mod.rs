// ABOUTME: Model module organization for Courtside domain records
// ABOUTME: Re-exports organization, coach, team, player, plan, observation, and activity types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

mod activity;
mod coach;
mod observation;
mod organization;
mod pdp;
mod player;
mod team;

pub use activity::{ActivityAction, ActivityLogEntry};
pub use coach::Coach;
pub use observation::Observation;
pub use organization::Organization;
pub use pdp::{Pdp, PdpStatus};
pub use player::Player;
pub use team::Team;
