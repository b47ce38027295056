//! Dashboard statistics derived from a fetched workout history.
//!
//! Nothing here performs I/O: the stats are recomputed from the last
//! snapshot whenever the workout list is refetched.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::Workout;

/// Number of workouts listed under "recent".
pub const RECENT_WORKOUT_LIMIT: usize = 3;

/// Length of the "this week" window, today included.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Home screen statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkoutStats {
    /// Workouts dated within the last 7 days (today inclusive)
    pub this_week_count: u32,
    /// Set logs across those workouts
    pub this_week_sets: u32,
    /// Latest workouts by effective date, newest first
    pub recent_workouts: Vec<Workout>,
    /// Consecutive-day run ending today or yesterday
    pub streak_days: u32,
}

impl WorkoutStats {
    /// Compute stats from a workout history as of `today`.
    ///
    /// Only workouts with at least one set log are considered. Workouts
    /// without a usable effective date are ignored.
    pub fn compute(workouts: &[Workout], today: NaiveDate) -> Self {
        let mut dated: Vec<(NaiveDate, &Workout)> = workouts
            .iter()
            .filter(|w| w.has_set_logs())
            .filter_map(|w| w.effective_date().map(|d| (d, w)))
            .collect();

        // Stable sort keeps gateway order for same-day workouts
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let week_start = today - Duration::days(WEEK_WINDOW_DAYS - 1);
        let (this_week_count, this_week_sets) = dated
            .iter()
            .filter(|(date, _)| *date >= week_start && *date <= today)
            .fold((0u32, 0u32), |(count, sets), (_, w)| {
                (count + 1, sets + w.set_log_count() as u32)
            });

        let recent_workouts = dated
            .iter()
            .take(RECENT_WORKOUT_LIMIT)
            .map(|(_, w)| (*w).clone())
            .collect();

        let streak_days = streak(dated.iter().map(|(date, _)| *date), today);

        Self {
            this_week_count,
            this_week_sets,
            recent_workouts,
            streak_days,
        }
    }
}

/// Walk dates newest-first, counting while each is at most one day before
/// the previous one (starting from `today`).
fn streak(dates_desc: impl Iterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = today;
    let mut count = 0;
    for date in dates_desc {
        if (cursor - date).num_days() <= 1 {
            count += 1;
            cursor = date;
        } else {
            break;
        }
    }
    count
}
