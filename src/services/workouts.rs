// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout tracking: the expanded-workout view and set-log submission.
//!
//! The tracker keeps the last-fetched snapshot of the user's workouts and the
//! exercise catalog, plus per-workout local state (expanded flag, selected
//! exercise, form inputs, resolved workout exercise ids). Every successful
//! mutation is followed by a refetch; nothing is edited optimistically.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};
use crate::gateway::GatewayApi;
use crate::models::workout::{CreateSetLogInput, CreateWorkoutExerciseInput, StartWorkoutInput};
use crate::models::{Exercise, SetLog, Workout};
use crate::time_utils::format_day;

/// Form inputs for one workout, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutInputs {
    pub selected_exercise_id: Option<String>,
    pub weight: String,
    pub rep_count: String,
}

/// A workout in the expanded view with its local state.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedWorkout {
    pub workout: Workout,
    pub expanded: bool,
    pub inputs: WorkoutInputs,
    /// Workout exercise ids keyed by catalog exercise id
    pub workout_exercise_ids: HashMap<String, String>,
}

impl ExpandedWorkout {
    fn new(workout: Workout) -> Self {
        let mut entry = Self {
            workout,
            expanded: false,
            inputs: WorkoutInputs::default(),
            workout_exercise_ids: HashMap::new(),
        };
        entry.seed_workout_exercise_ids();
        entry
    }

    /// Remember workout exercises the gateway already knows about.
    fn seed_workout_exercise_ids(&mut self) {
        for we in &self.workout.workout_exercises {
            self.workout_exercise_ids
                .entry(we.exercise.id.clone())
                .or_insert_with(|| we.id.clone());
        }
    }
}

/// A set log together with its exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub exercise: Exercise,
    pub set_log: SetLog,
}

/// Set log submission. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SetLogDraft {
    #[validate(
        required(message = "workout is required"),
        length(min = 1, message = "workout is required")
    )]
    pub workout_id: Option<String>,
    #[validate(
        required(message = "exercise is required"),
        length(min = 1, message = "exercise is required")
    )]
    pub exercise_id: Option<String>,
    #[validate(
        required(message = "weight is required"),
        range(min = 0.0, message = "weight must not be negative"),
        custom(function = "finite_weight")
    )]
    pub weight: Option<f64>,
    #[validate(
        required(message = "rep count is required"),
        range(min = 1, message = "rep count must be at least 1")
    )]
    pub rep_count: Option<u32>,
}

impl SetLogDraft {
    /// Build a draft from a workout's form inputs.
    pub fn from_inputs(workout_id: &str, inputs: &WorkoutInputs) -> Result<Self> {
        Ok(Self {
            workout_id: Some(workout_id.to_string()),
            exercise_id: inputs.selected_exercise_id.clone(),
            weight: parse_input(&inputs.weight, "weight")?,
            rep_count: parse_input(&inputs.rep_count, "rep count")?,
        })
    }
}

// NaN passes a range check and serializes as null
fn finite_weight(weight: f64) -> std::result::Result<(), ValidationError> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message("weight must be a number".into()))
    }
}

fn parse_input<T: std::str::FromStr>(raw: &str, field: &str) -> Result<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}

/// Merge fetched workouts into the expanded view, keyed by workout id.
///
/// Local state survives for workouts that are still present. New workouts
/// start collapsed with empty inputs; workouts missing from the fetch are
/// dropped. The fetched order wins.
pub fn merge_expanded(previous: Vec<ExpandedWorkout>, fetched: &[Workout]) -> Vec<ExpandedWorkout> {
    let mut previous: HashMap<String, ExpandedWorkout> = previous
        .into_iter()
        .map(|e| (e.workout.id.clone(), e))
        .collect();

    fetched
        .iter()
        .map(|workout| match previous.remove(&workout.id) {
            Some(mut entry) => {
                entry.workout = workout.clone();
                entry.seed_workout_exercise_ids();
                entry
            }
            None => ExpandedWorkout::new(workout.clone()),
        })
        .collect()
}

#[derive(Default)]
struct TrackerState {
    expanded: Vec<ExpandedWorkout>,
    exercises: Vec<Exercise>,
}

impl TrackerState {
    fn entry(&self, workout_id: &str) -> Option<&ExpandedWorkout> {
        self.expanded.iter().find(|e| e.workout.id == workout_id)
    }

    fn entry_mut(&mut self, workout_id: &str) -> Result<&mut ExpandedWorkout> {
        self.expanded
            .iter_mut()
            .find(|e| e.workout.id == workout_id)
            .ok_or_else(|| AppError::NotFound(format!("workout {}", workout_id)))
    }
}

/// Workout view and set-log submission for the signed-in user.
pub struct WorkoutTracker {
    api: GatewayApi,
    state: RwLock<TrackerState>,
}

impl WorkoutTracker {
    pub fn new(api: GatewayApi) -> Self {
        Self {
            api,
            state: RwLock::new(TrackerState::default()),
        }
    }

    /// Fetch workouts and the exercise catalog and merge them into the view.
    pub async fn refresh(&self) -> Result<()> {
        let workouts = self.api.workouts().await?;
        let exercises = self.api.exercises().await?;

        let mut state = self.state.write().await;
        let previous = std::mem::take(&mut state.expanded);
        state.expanded = merge_expanded(previous, &workouts);
        state.exercises = exercises;

        tracing::debug!(
            workouts = state.expanded.len(),
            exercises = state.exercises.len(),
            "Workouts refreshed"
        );
        Ok(())
    }

    /// Drop the snapshot and all local view state.
    pub async fn reset(&self) {
        *self.state.write().await = TrackerState::default();
    }

    /// Refetch after a mutation. The mutation already succeeded, so a failed
    /// refetch only leaves the view stale.
    async fn refetch(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to refetch workouts after mutation");
        }
    }

    // ─── Snapshot ────────────────────────────────────────────────────────────

    pub async fn expanded_workouts(&self) -> Vec<ExpandedWorkout> {
        self.state.read().await.expanded.clone()
    }

    /// The user's workouts as last fetched.
    pub async fn workouts(&self) -> Vec<Workout> {
        self.state
            .read()
            .await
            .expanded
            .iter()
            .map(|e| e.workout.clone())
            .collect()
    }

    pub async fn exercises(&self) -> Vec<Exercise> {
        self.state.read().await.exercises.clone()
    }

    pub async fn workout_by_id(&self, workout_id: &str) -> Option<Workout> {
        self.state
            .read()
            .await
            .entry(workout_id)
            .map(|e| e.workout.clone())
    }

    /// A workout is owned by the user if it is in the user's own list.
    pub async fn is_workout_owner(&self, workout_id: &str) -> bool {
        self.state.read().await.entry(workout_id).is_some()
    }

    /// Every set logged in a workout, in gateway order.
    pub async fn set_logs_for_workout(&self, workout_id: &str) -> Vec<LoggedSet> {
        let state = self.state.read().await;
        let Some(entry) = state.entry(workout_id) else {
            return Vec::new();
        };

        entry
            .workout
            .workout_exercises
            .iter()
            .flat_map(|we| {
                we.set_logs.iter().map(|set_log| LoggedSet {
                    exercise: we.exercise.clone(),
                    set_log: set_log.clone(),
                })
            })
            .collect()
    }

    pub async fn set_logs_for_exercise(&self, workout_id: &str, exercise_id: &str) -> Vec<LoggedSet> {
        self.set_logs_for_workout(workout_id)
            .await
            .into_iter()
            .filter(|logged| logged.exercise.id == exercise_id)
            .collect()
    }

    /// Exercises already logged in the workout first, then the catalog.
    pub async fn available_exercises(&self, workout_id: &str) -> Vec<Exercise> {
        let state = self.state.read().await;
        let logged = state
            .entry(workout_id)
            .map(|e| {
                e.workout
                    .workout_exercises
                    .iter()
                    .filter(|we| !we.set_logs.is_empty())
                    .map(|we| we.exercise.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut seen = HashSet::new();
        logged
            .into_iter()
            .chain(state.exercises.iter().cloned())
            .filter(|exercise| seen.insert(exercise.id.clone()))
            .collect()
    }

    /// Set number the next log for this pairing will get.
    pub async fn next_set_number(&self, workout_id: &str, exercise_id: &str) -> u32 {
        let state = self.state.read().await;
        let existing = state
            .entry(workout_id)
            .map(|e| e.workout.set_count_for(exercise_id))
            .unwrap_or(0);
        existing as u32 + 1
    }

    // ─── Local state ─────────────────────────────────────────────────────────

    pub async fn toggle_expanded(&self, workout_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let entry = state.entry_mut(workout_id)?;
        entry.expanded = !entry.expanded;
        Ok(entry.expanded)
    }

    pub async fn select_exercise(&self, workout_id: &str, exercise_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.entry_mut(workout_id)?.inputs.selected_exercise_id = Some(exercise_id.to_string());
        Ok(())
    }

    pub async fn set_weight_input(&self, workout_id: &str, weight: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.entry_mut(workout_id)?.inputs.weight = weight.to_string();
        Ok(())
    }

    pub async fn set_rep_input(&self, workout_id: &str, rep_count: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.entry_mut(workout_id)?.inputs.rep_count = rep_count.to_string();
        Ok(())
    }

    // ─── Mutations ───────────────────────────────────────────────────────────

    /// Start a workout, optionally dated and in a group.
    pub async fn start_workout(
        &self,
        date: Option<NaiveDate>,
        workout_group_id: Option<&str>,
    ) -> Result<Workout> {
        let input = StartWorkoutInput {
            date: date.map(format_day),
            workout_group_id: workout_group_id.map(str::to_string),
        };

        let workout = self.api.start_workout(&input).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to start workout");
        })?;

        tracing::info!(workout_id = %workout.id, "Workout started");
        self.refetch().await;
        Ok(workout)
    }

    /// Log one set.
    ///
    /// Creates the workout exercise for the pairing on first use. The two
    /// creates are separate round-trips; if the set log fails, the workout
    /// exercise stays behind empty and is reused on the next attempt.
    pub async fn add_set_log(&self, draft: SetLogDraft) -> Result<SetLog> {
        draft.validate()?;
        let (Some(workout_id), Some(exercise_id), Some(weight), Some(rep_count)) = (
            draft.workout_id,
            draft.exercise_id,
            draft.weight,
            draft.rep_count,
        ) else {
            return Err(AppError::Validation("all fields are required".to_string()));
        };

        let workout_exercise_id = self
            .resolve_workout_exercise(&workout_id, &exercise_id)
            .await?;
        let set_number = self.next_set_number(&workout_id, &exercise_id).await;

        let input = CreateSetLogInput {
            workout_exercise_id,
            set_number,
            weight,
            rep_count,
        };

        let set_log = self.api.create_set_log(&input).await.inspect_err(|e| {
            tracing::warn!(
                workout_id = %workout_id,
                exercise_id = %exercise_id,
                error = %e,
                "Failed to create set log"
            );
        })?;

        tracing::info!(
            workout_id = %workout_id,
            exercise_id = %exercise_id,
            set_number,
            "Set logged"
        );

        {
            let mut state = self.state.write().await;
            if let Ok(entry) = state.entry_mut(&workout_id) {
                entry.inputs.weight.clear();
                entry.inputs.rep_count.clear();
            }
        }

        self.refetch().await;
        Ok(set_log)
    }

    /// Submit the set currently typed into a workout's form.
    pub async fn submit_pending(&self, workout_id: &str) -> Result<SetLog> {
        let inputs = {
            let state = self.state.read().await;
            state
                .entry(workout_id)
                .map(|e| e.inputs.clone())
                .ok_or_else(|| AppError::NotFound(format!("workout {}", workout_id)))?
        };

        let draft = SetLogDraft::from_inputs(workout_id, &inputs)?;
        self.add_set_log(draft).await
    }

    /// Find the workout exercise for a pairing, creating it if needed.
    pub async fn resolve_workout_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<String> {
        {
            let state = self.state.read().await;
            let entry = state
                .entry(workout_id)
                .ok_or_else(|| AppError::NotFound(format!("workout {}", workout_id)))?;
            if let Some(id) = entry.workout_exercise_ids.get(exercise_id) {
                return Ok(id.clone());
            }
        }

        let input = CreateWorkoutExerciseInput {
            workout_id: workout_id.to_string(),
            exercise_id: exercise_id.to_string(),
        };
        let created = self.api.create_workout_exercise(&input).await?;

        tracing::debug!(
            workout_id,
            exercise_id,
            workout_exercise_id = %created.id,
            "Workout exercise created"
        );

        let mut state = self.state.write().await;
        if let Ok(entry) = state.entry_mut(workout_id) {
            entry
                .workout_exercise_ids
                .insert(exercise_id.to_string(), created.id.clone());
        }

        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutExercise;

    fn workout(id: &str, sets: &[(&str, &str, usize)]) -> Workout {
        Workout {
            id: id.to_string(),
            date: Some("2024-05-01".to_string()),
            created_at: None,
            updated_at: None,
            workout_group: None,
            workout_exercises: sets
                .iter()
                .map(|(we_id, exercise_id, count)| WorkoutExercise {
                    id: we_id.to_string(),
                    exercise: Exercise {
                        id: exercise_id.to_string(),
                        name: exercise_id.to_string(),
                        category: None,
                        description: None,
                    },
                    set_logs: (1..=*count as u32)
                        .map(|n| SetLog {
                            id: format!("{}-{}", we_id, n),
                            weight: 50.0,
                            rep_count: 10,
                            set_number: n,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_preserves_local_state() {
        let mut first = merge_expanded(Vec::new(), &[workout("w1", &[]), workout("w2", &[])]);
        first[0].expanded = true;
        first[0].inputs.weight = "80".to_string();

        let merged = merge_expanded(first, &[workout("w3", &[]), workout("w1", &[])]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].workout.id, "w3");
        assert!(!merged[0].expanded);
        assert_eq!(merged[1].workout.id, "w1");
        assert!(merged[1].expanded);
        assert_eq!(merged[1].inputs.weight, "80");
    }

    #[test]
    fn test_merge_seeds_workout_exercise_ids() {
        let merged = merge_expanded(Vec::new(), &[workout("w1", &[("we1", "bench", 2)])]);
        assert_eq!(
            merged[0].workout_exercise_ids.get("bench").map(String::as_str),
            Some("we1")
        );
    }

    #[test]
    fn test_draft_validation() {
        let complete = SetLogDraft {
            workout_id: Some("w1".to_string()),
            exercise_id: Some("bench".to_string()),
            weight: Some(0.0),
            rep_count: Some(1),
        };
        assert!(complete.validate().is_ok());

        let missing = SetLogDraft {
            weight: None,
            ..complete.clone()
        };
        assert!(missing.validate().is_err());

        let no_reps = SetLogDraft {
            rep_count: Some(0),
            ..complete.clone()
        };
        assert!(no_reps.validate().is_err());

        let negative = SetLogDraft {
            weight: Some(-1.0),
            ..complete
        };
        let err = AppError::from(negative.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("negative")));
    }

    #[test]
    fn test_draft_rejects_non_finite_weight() {
        for raw in ["NaN", "inf", "-inf"] {
            let inputs = WorkoutInputs {
                selected_exercise_id: Some("bench".to_string()),
                weight: raw.to_string(),
                rep_count: "5".to_string(),
            };
            let draft = SetLogDraft::from_inputs("w1", &inputs).unwrap();
            let err = AppError::from(draft.validate().unwrap_err());
            assert!(matches!(err, AppError::Validation(_)), "{} accepted", raw);
        }
    }

    #[test]
    fn test_draft_from_inputs() {
        let inputs = WorkoutInputs {
            selected_exercise_id: Some("squat".to_string()),
            weight: " 62.5 ".to_string(),
            rep_count: "".to_string(),
        };
        let draft = SetLogDraft::from_inputs("w1", &inputs).unwrap();
        assert_eq!(draft.weight, Some(62.5));
        assert_eq!(draft.rep_count, None);

        let bad = WorkoutInputs {
            rep_count: "ten".to_string(),
            ..inputs
        };
        assert!(matches!(
            SetLogDraft::from_inputs("w1", &bad),
            Err(AppError::Validation(_))
        ));
    }
}
