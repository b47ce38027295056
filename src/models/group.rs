// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout group models.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::user::{UserSummary, UNNAMED_USER};
use crate::models::Workout;

/// A participant's workout inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupWorkout {
    #[serde(flatten)]
    pub workout: Workout,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

/// Shared workout group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutGroup {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub workouts: Vec<GroupWorkout>,
}

/// Group member row, one per participant workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMember {
    pub workout_id: String,
    pub user_id: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub user_name: String,
}

impl WorkoutGroup {
    /// Members derived from the group's workouts.
    pub fn members(&self) -> Vec<GroupMember> {
        self.workouts
            .iter()
            .map(|gw| GroupMember {
                workout_id: gw.workout.id.clone(),
                user_id: gw.user.as_ref().map(|u| u.id.clone()),
                date: gw.workout.date.clone(),
                created_at: gw.workout.created_at.clone(),
                user_name: gw
                    .user
                    .as_ref()
                    .map(|u| u.display_name().to_string())
                    .unwrap_or_else(|| UNNAMED_USER.to_string()),
            })
            .collect()
    }

    /// Whether the given user already has a workout in this group.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.workouts
            .iter()
            .any(|gw| gw.user.as_ref().is_some_and(|u| u.id == user_id))
    }
}

/// Input for `createWorkoutGroup`.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CreateWorkoutGroupInput {
    #[validate(length(min = 1, max = 255, message = "group title must be 1-255 characters"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[validate(custom(function = "validate_https_url"))]
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Input for `addWorkoutGroupMember`.
#[derive(Debug, Clone, Serialize)]
pub struct AddWorkoutGroupMemberInput {
    #[serde(rename = "workoutGroupID")]
    pub workout_group_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

fn validate_https_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("https_required")
            .with_message("image URL must start with https://".into()))
    }
}
