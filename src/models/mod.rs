// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod friendship;
pub mod group;
pub mod profile;
pub mod purchase;
pub mod stats;
pub mod user;
pub mod workout;

pub use friendship::{Friendship, FriendshipStatus};
pub use group::{GroupMember, GroupWorkout, WorkoutGroup};
pub use profile::{ActivityLevel, Gender, Profile, ProfileInput};
pub use purchase::{CustomerInfo, Entitlement, Offering, Package};
pub use stats::WorkoutStats;
pub use user::{Identity, ProfileSummary, UserSummary};
pub use workout::{Exercise, SetLog, Workout, WorkoutExercise, WorkoutGroupRef};
