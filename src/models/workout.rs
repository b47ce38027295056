// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout, exercise and set-log models as selected from the gateway.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time_utils::parse_day;

/// Exercise catalog entry (read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    pub id: String,
    /// Weight in kilograms
    pub weight: f64,
    pub rep_count: u32,
    /// 1-indexed within its workout exercise
    pub set_number: u32,
}

/// Join between a workout and an exercise, holding that exercise's sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: String,
    pub exercise: Exercise,
    #[serde(default)]
    pub set_logs: Vec<SetLog>,
}

/// Group reference embedded in a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutGroupRef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// A dated training session belonging to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    /// Explicit session date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: Option<String>,
    /// Creation timestamp (RFC3339)
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub workout_group: Option<WorkoutGroupRef>,
    #[serde(default)]
    pub workout_exercises: Vec<WorkoutExercise>,
}

impl Workout {
    /// The explicit date if present, else the creation day.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(parse_day)
            .or_else(|| self.created_at.as_deref().and_then(parse_day))
    }

    /// Total number of set logs across all exercises.
    pub fn set_log_count(&self) -> usize {
        self.workout_exercises.iter().map(|we| we.set_logs.len()).sum()
    }

    pub fn has_set_logs(&self) -> bool {
        self.workout_exercises.iter().any(|we| !we.set_logs.is_empty())
    }

    /// Workout exercises recorded for the given catalog exercise.
    pub fn exercises_for<'a>(
        &'a self,
        exercise_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkoutExercise> + 'a {
        self.workout_exercises
            .iter()
            .filter(move |we| we.exercise.id == exercise_id)
    }

    /// Number of sets already logged for the given exercise.
    pub fn set_count_for(&self, exercise_id: &str) -> usize {
        self.exercises_for(exercise_id)
            .map(|we| we.set_logs.len())
            .sum()
    }
}

/// Input for `startWorkout`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkoutInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "workoutGroupID", skip_serializing_if = "Option::is_none")]
    pub workout_group_id: Option<String>,
}

/// Input for `createWorkoutExercise`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkoutExerciseInput {
    #[serde(rename = "workoutID")]
    pub workout_id: String,
    #[serde(rename = "exerciseID")]
    pub exercise_id: String,
}

/// Input for `createSetLog`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetLogInput {
    #[serde(rename = "workoutExerciseID")]
    pub workout_exercise_id: String,
    pub set_number: u32,
    pub weight: f64,
    pub rep_count: u32,
}
