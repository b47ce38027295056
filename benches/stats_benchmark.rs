use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use fitness_sync::models::{Exercise, SetLog, Workout, WorkoutExercise, WorkoutStats};
use std::hint::black_box;

/// `days` of history ending at `today`, one workout per day except every
/// fifth day, with a few sets each.
fn history(today: NaiveDate, days: i64) -> Vec<Workout> {
    (0..days)
        .filter(|d| d % 5 != 4)
        .map(|d| {
            let date = today - Duration::days(d);
            Workout {
                id: format!("w{}", d),
                date: Some(date.format("%Y-%m-%d").to_string()),
                created_at: None,
                updated_at: None,
                workout_group: None,
                workout_exercises: vec![WorkoutExercise {
                    id: format!("we{}", d),
                    exercise: Exercise {
                        id: "squat".to_string(),
                        name: "Squat".to_string(),
                        category: None,
                        description: None,
                    },
                    set_logs: (1..=4)
                        .map(|n| SetLog {
                            id: format!("s{}-{}", d, n),
                            weight: 100.0,
                            rep_count: 5,
                            set_number: n,
                        })
                        .collect(),
                }],
            }
        })
        .collect()
}

fn benchmark_compute_stats(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default();
    let year = history(today, 365);
    let decade = history(today, 3650);

    let mut group = c.benchmark_group("workout_stats");

    group.bench_function("one_year", |b| {
        b.iter(|| WorkoutStats::compute(black_box(&year), today))
    });

    group.bench_function("ten_years", |b| {
        b.iter(|| WorkoutStats::compute(black_box(&decade), today))
    });

    group.finish();
}

criterion_group!(benches, benchmark_compute_stats);
criterion_main!(benches);
