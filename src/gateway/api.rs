// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed gateway operations.

use super::{documents, Gateway, Operation};
use crate::error::{AppError, Result};
use crate::models::friendship::{
    AddFriendByQrCodeInput, FriendshipIdInput, SendFriendshipRequestInput,
};
use crate::models::group::{AddWorkoutGroupMemberInput, CreateWorkoutGroupInput};
use crate::models::workout::{CreateSetLogInput, CreateWorkoutExerciseInput, StartWorkoutInput};
use crate::models::{
    Exercise, Friendship, Profile, ProfileInput, SetLog, UserSummary, Workout, WorkoutExercise,
    WorkoutGroup,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// The signed-in user as the gateway knows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Gateway user id
    pub id: String,
    /// Identity provider uid
    pub uid: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Typed wrapper over a [`Gateway`].
#[derive(Clone)]
pub struct GatewayApi {
    gateway: Arc<dyn Gateway>,
}

impl GatewayApi {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    // ─── User & Profile ──────────────────────────────────────────────────────

    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.fetch(&documents::CURRENT_USER, json!({}), "/currentUser")
            .await
    }

    pub async fn create_profile(&self, input: &ProfileInput) -> Result<Profile> {
        self.fetch(
            &documents::CREATE_PROFILE,
            json!({ "input": input }),
            "/createProfile",
        )
        .await
    }

    pub async fn update_profile(&self, input: &ProfileInput) -> Result<Profile> {
        self.fetch(
            &documents::UPDATE_PROFILE,
            json!({ "input": input }),
            "/updateProfile",
        )
        .await
    }

    // ─── Workouts ────────────────────────────────────────────────────────────

    /// The signed-in user's workouts.
    pub async fn workouts(&self) -> Result<Vec<Workout>> {
        self.fetch_list(&documents::WORKOUTS, json!({}), "/currentUser/workouts")
            .await
    }

    /// Exercise catalog.
    pub async fn exercises(&self) -> Result<Vec<Exercise>> {
        self.fetch_list(&documents::EXERCISES, json!({}), "/exercises")
            .await
    }

    pub async fn start_workout(&self, input: &StartWorkoutInput) -> Result<Workout> {
        self.fetch(
            &documents::START_WORKOUT,
            json!({ "input": input }),
            "/startWorkout",
        )
        .await
    }

    pub async fn create_workout_exercise(
        &self,
        input: &CreateWorkoutExerciseInput,
    ) -> Result<WorkoutExercise> {
        self.fetch(
            &documents::CREATE_WORKOUT_EXERCISE,
            json!({ "input": input }),
            "/createWorkoutExercise",
        )
        .await
    }

    pub async fn create_set_log(&self, input: &CreateSetLogInput) -> Result<SetLog> {
        self.fetch(
            &documents::CREATE_SET_LOG,
            json!({ "input": input }),
            "/createSetLog",
        )
        .await
    }

    // ─── Groups ──────────────────────────────────────────────────────────────

    pub async fn workout_groups(&self) -> Result<Vec<WorkoutGroup>> {
        self.fetch_list(&documents::WORKOUT_GROUPS, json!({}), "/workoutGroups")
            .await
    }

    pub async fn workout_group(&self, id: &str) -> Result<Option<WorkoutGroup>> {
        self.fetch(
            &documents::WORKOUT_GROUP,
            json!({ "id": id }),
            "/workoutGroup",
        )
        .await
    }

    pub async fn create_workout_group(
        &self,
        input: &CreateWorkoutGroupInput,
    ) -> Result<WorkoutGroup> {
        self.fetch(
            &documents::CREATE_WORKOUT_GROUP,
            json!({ "input": input }),
            "/createWorkoutGroup",
        )
        .await
    }

    pub async fn add_workout_group_member(
        &self,
        input: &AddWorkoutGroupMemberInput,
    ) -> Result<WorkoutGroup> {
        self.fetch(
            &documents::ADD_WORKOUT_GROUP_MEMBER,
            json!({ "input": input }),
            "/addWorkoutGroupMember",
        )
        .await
    }

    // ─── Friendships ─────────────────────────────────────────────────────────

    pub async fn friends(&self) -> Result<Vec<UserSummary>> {
        self.fetch_list(&documents::FRIENDS, json!({}), "/currentUser/friends")
            .await
    }

    pub async fn friendship_requests(&self) -> Result<Vec<Friendship>> {
        self.fetch_list(
            &documents::FRIENDSHIP_REQUESTS,
            json!({}),
            "/currentUser/friendshipRequests",
        )
        .await
    }

    pub async fn send_friendship_request(
        &self,
        input: &SendFriendshipRequestInput,
    ) -> Result<Friendship> {
        self.fetch(
            &documents::SEND_FRIENDSHIP_REQUEST,
            json!({ "input": input }),
            "/sendFriendshipRequest",
        )
        .await
    }

    pub async fn accept_friendship_request(&self, input: &FriendshipIdInput) -> Result<Friendship> {
        self.fetch(
            &documents::ACCEPT_FRIENDSHIP_REQUEST,
            json!({ "input": input }),
            "/acceptFriendshipRequest",
        )
        .await
    }

    pub async fn reject_friendship_request(&self, input: &FriendshipIdInput) -> Result<Friendship> {
        self.fetch(
            &documents::REJECT_FRIENDSHIP_REQUEST,
            json!({ "input": input }),
            "/rejectFriendshipRequest",
        )
        .await
    }

    pub async fn add_friend_by_qr_code(&self, input: &AddFriendByQrCodeInput) -> Result<Friendship> {
        self.fetch(
            &documents::ADD_FRIEND_BY_QR_CODE,
            json!({ "input": input }),
            "/addFriendByQRCode",
        )
        .await
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    /// Execute an operation and decode the value at `pointer` inside `data`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
        pointer: &str,
    ) -> Result<T> {
        let data = self.gateway.execute(operation, variables).await?;
        let value = data.pointer(pointer).cloned().unwrap_or(Value::Null);
        decode(operation, value)
    }

    /// Like `fetch`, but a missing or null list decodes as empty.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
        pointer: &str,
    ) -> Result<Vec<T>> {
        let data = self.gateway.execute(operation, variables).await?;
        match data.pointer(pointer) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => decode(operation, value.clone()),
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &Operation, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Gateway(format!("{}: unexpected response shape: {}", operation.name, e))
    })
}
