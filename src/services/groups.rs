// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout group directory.

use std::collections::HashSet;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use validator::Validate;

use super::Confirm;
use crate::error::{AppError, Result};
use crate::gateway::GatewayApi;
use crate::models::group::{AddWorkoutGroupMemberInput, CreateWorkoutGroupInput};
use crate::models::{GroupMember, UserSummary, Workout, WorkoutGroup, WorkoutGroupRef};
use crate::time_utils::format_day;

/// Groups referenced by any of the user's workouts, first-seen order.
pub fn joined_groups(workouts: &[Workout]) -> Vec<WorkoutGroupRef> {
    let mut seen = HashSet::new();
    workouts
        .iter()
        .filter_map(|w| w.workout_group.as_ref())
        .filter(|g| seen.insert(g.id.clone()))
        .cloned()
        .collect()
}

/// All groups minus the ones the user already has a workout in.
pub fn available_groups(all: &[WorkoutGroup], workouts: &[Workout]) -> Vec<WorkoutGroup> {
    let joined: HashSet<&str> = workouts
        .iter()
        .filter_map(|w| w.workout_group.as_ref())
        .map(|g| g.id.as_str())
        .collect();

    all.iter()
        .filter(|g| !joined.contains(g.id.as_str()))
        .cloned()
        .collect()
}

#[derive(Default)]
struct GroupState {
    groups: Vec<WorkoutGroup>,
    workouts: Vec<Workout>,
}

/// All workout groups and the user's memberships.
pub struct GroupDirectory {
    api: GatewayApi,
    state: RwLock<GroupState>,
}

impl GroupDirectory {
    pub fn new(api: GatewayApi) -> Self {
        Self {
            api,
            state: RwLock::new(GroupState::default()),
        }
    }

    /// Fetch all groups and the user's workouts.
    pub async fn refresh(&self) -> Result<()> {
        let groups = self.api.workout_groups().await?;
        let workouts = self.api.workouts().await?;

        let mut state = self.state.write().await;
        state.groups = groups;
        state.workouts = workouts;

        tracing::debug!(groups = state.groups.len(), "Workout groups refreshed");
        Ok(())
    }

    async fn refetch(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to refetch workout groups after mutation");
        }
    }

    /// Drop fetched groups and memberships.
    pub async fn reset(&self) {
        *self.state.write().await = GroupState::default();
    }

    pub async fn all_groups(&self) -> Vec<WorkoutGroup> {
        self.state.read().await.groups.clone()
    }

    pub async fn available_groups(&self) -> Vec<WorkoutGroup> {
        let state = self.state.read().await;
        available_groups(&state.groups, &state.workouts)
    }

    pub async fn joined_groups(&self) -> Vec<WorkoutGroupRef> {
        joined_groups(&self.state.read().await.workouts)
    }

    /// Fetch one group with its participant workouts.
    pub async fn group(&self, group_id: &str) -> Result<WorkoutGroup> {
        self.api
            .workout_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("workout group {}", group_id)))
    }

    pub fn members(&self, group: &WorkoutGroup) -> Vec<GroupMember> {
        group.members()
    }

    pub async fn create_group(
        &self,
        title: &str,
        date: Option<NaiveDate>,
        image_url: Option<&str>,
    ) -> Result<WorkoutGroup> {
        let input = CreateWorkoutGroupInput {
            title: title.trim().to_string(),
            date: date.map(format_day),
            image_url: image_url.map(str::to_string),
        };
        input.validate()?;

        let group = self.api.create_workout_group(&input).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to create workout group");
        })?;

        tracing::info!(group_id = %group.id, title = %group.title, "Workout group created");
        self.refetch().await;
        Ok(group)
    }

    /// Add a user to a group after confirmation.
    ///
    /// Returns `Ok(None)` if the user declined.
    pub async fn add_member(
        &self,
        group_id: &str,
        user: &UserSummary,
        confirm: &dyn Confirm,
    ) -> Result<Option<WorkoutGroup>> {
        let group = self.group(group_id).await?;
        if group.has_member(&user.id) {
            return Err(AppError::Validation(format!(
                "{} is already a member of this group",
                user.display_name()
            )));
        }

        let prompt = format!("Add {} to {}?", user.display_name(), group.title);
        if !confirm.confirm(&prompt) {
            tracing::debug!(group_id, user_id = %user.id, "Add member declined");
            return Ok(None);
        }

        let input = AddWorkoutGroupMemberInput {
            workout_group_id: group_id.to_string(),
            user_id: user.id.clone(),
        };
        let updated = self.api.add_workout_group_member(&input).await.inspect_err(|e| {
            tracing::warn!(group_id, user_id = %user.id, error = %e, "Failed to add group member");
        })?;

        tracing::info!(group_id, user_id = %user.id, "Group member added");
        self.refetch().await;
        Ok(Some(updated))
    }
}
