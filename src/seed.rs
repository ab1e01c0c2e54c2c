//! Initial data seeding and the demo-data patch.
//!
//! Seeding runs at startup after migrations. Failures are logged and
//! swallowed by the caller; the app still starts with whatever data is
//! present.

use chrono::{Duration, Local, Utc};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{ChallengeKind, Difficulty, MetricKind, NewWorkout, User, TEMPLATES};
use crate::repositories::{
    ChallengeRepository, ExerciseRepository, MetricRepository, QuoteRepository, UserRepository,
    WorkoutRepository,
};

pub async fn seed_initial_data(pool: &DbPool) -> Result<()> {
    let user_repo = UserRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let quote_repo = QuoteRepository::new(pool.clone());
    let challenge_repo = ChallengeRepository::new(pool.clone());
    let metric_repo = MetricRepository::new(pool.clone());

    let today = Local::now().date_naive();

    if user_repo.count().await? == 0 {
        user_repo
            .create("Jobayer Mahbub", Some("jobayer@example.com"))
            .await?;
        tracing::info!("Default user created");
    }

    if exercise_repo.count().await? == 0 {
        exercise_repo
            .create(
                "Push Up",
                "push",
                &["chest", "shoulders", "triceps"],
                Some("Start in plank position, lower body to ground, push back up"),
                Difficulty::Intermediate,
                15,
            )
            .await?;
        exercise_repo
            .create(
                "Sit Up",
                "core",
                &["abs", "core"],
                Some("Lie on back, sit up bringing chest to knees"),
                Difficulty::Beginner,
                10,
            )
            .await?;
        exercise_repo
            .create(
                "Squats",
                "legs",
                &["quadriceps", "glutes", "hamstrings"],
                Some("Stand with feet hip-width apart, lower down as if sitting, return to standing"),
                Difficulty::Beginner,
                12,
            )
            .await?;
        exercise_repo
            .create(
                "Plank",
                "core",
                &["abs", "core", "shoulders"],
                Some("Hold body in straight line from head to heels"),
                Difficulty::Intermediate,
                20,
            )
            .await?;
        tracing::info!("Initial exercises seeded");
    }

    if quote_repo.count().await? == 0 {
        quote_repo
            .create(
                "The only bad workout is the one that didn't happen.",
                Some("Unknown"),
                Some("motivation"),
            )
            .await?;
        quote_repo
            .create(
                "Your body can do it. It's your mind you need to convince.",
                Some("Unknown"),
                Some("motivation"),
            )
            .await?;
        quote_repo
            .create(
                "Strength doesn't come from what you can do. It comes from overcoming the things you once thought you couldn't.",
                Some("Rikki Rogers"),
                Some("strength"),
            )
            .await?;
        quote_repo
            .create(
                "Success isn't always about greatness. It's about consistency.",
                Some("Dwayne Johnson"),
                Some("success"),
            )
            .await?;
        quote_repo
            .create(
                "The groundwork for all happiness is good health.",
                Some("Leigh Hunt"),
                Some("fitness"),
            )
            .await?;
        tracing::info!("Motivational quotes seeded");
    }

    if challenge_repo.count_for_date(today).await? == 0 {
        challenge_repo
            .create(
                "Push Up Challenge",
                "Complete 100 push-ups today",
                ChallengeKind::Workout,
                100,
                100,
                today,
            )
            .await?;
        challenge_repo
            .create(
                "Sit Up Challenge",
                "Complete 30 sit-ups today",
                ChallengeKind::Workout,
                30,
                50,
                today,
            )
            .await?;
        challenge_repo
            .create(
                "Water Intake",
                "Drink 2000ml of water today",
                ChallengeKind::Water,
                2000,
                30,
                today,
            )
            .await?;
        tracing::info!("Daily challenges seeded for today");
    }

    if metric_repo.count().await? == 0 {
        if let Some(user) = user_repo.current().await? {
            metric_repo
                .log(user.id, MetricKind::Steps, 2390.0, "count", today)
                .await?;
            metric_repo
                .log(user.id, MetricKind::WaterIntake, 1000.0, "ml", today)
                .await?;
            metric_repo
                .log(user.id, MetricKind::Weight, 70.0, "kg", today)
                .await?;
            tracing::info!("Health metrics seeded");
        }
    }

    Ok(())
}

/// Demo strength exercises logged by the demo history, with starting
/// weights that the four-week progression builds on.
const DEMO_LIFTS: &[(&str, &str, &[&str], f64)] = &[
    ("Bench Press", "push", &["chest", "triceps"], 90.0),
    ("Squat", "legs", &["quadriceps", "glutes"], 120.0),
    ("Deadlift", "pull", &["back", "hamstrings"], 150.0),
    ("Overhead Press", "push", &["shoulders"], 55.0),
];

/// Patch the profile with canned demo values and, when the log is still
/// empty, backfill a deterministic four-week workout history so
/// calendars, charts, and records have substance.
pub async fn apply_demo_data(pool: &DbPool) -> Result<Option<User>> {
    let user_repo = UserRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());

    let Some(user) = user_repo.current().await? else {
        return Ok(None);
    };

    let user = user_repo.apply_demo_profile(user.id).await?;
    tracing::info!("User updated with demo data");

    if workout_repo.stats_for_user(user.id).await?.total_workouts > 0 {
        return Ok(Some(user));
    }

    let mut lifts = Vec::new();
    for (name, category, muscles, base_weight) in DEMO_LIFTS {
        let existing = exercise_repo.find_by_category(category).await?;
        let exercise = match existing.into_iter().find(|e| e.name == *name) {
            Some(e) => e,
            None => {
                exercise_repo
                    .create(name, category, muscles, None, Difficulty::Intermediate, 15)
                    .await?
            }
        };
        lifts.push((exercise, *base_weight));
    }

    let now = Utc::now();
    let mut workout_index = 0usize;
    for days_ago in (0..28).rev() {
        // Two rest days per week
        if days_ago % 7 == 2 || days_ago % 7 == 5 {
            continue;
        }

        let template = TEMPLATES[workout_index % TEMPLATES.len()];
        let created_at = now - Duration::days(days_ago);
        let duration = template.duration_mins as i64;
        let calories =
            (template.workout_type.met() * 70.0 * duration as f64 / 60.0).round() as i64;

        let workout = workout_repo
            .create(NewWorkout {
                user_id: user.id,
                name: template.name.to_string(),
                workout_type: template.workout_type,
                duration: Some(duration),
                calories_burned: Some(calories),
                xp_earned: 50,
                difficulty: Difficulty::Intermediate,
                is_completed: true,
                completed_at: Some(created_at),
                created_at,
            })
            .await?;

        // Two lifts per session, weights creeping up week over week
        let week = (27 - days_ago) / 7;
        for slot in 0..2 {
            let (exercise, base_weight) = &lifts[(workout_index + slot) % lifts.len()];
            let weight = base_weight + week as f64 * 2.5;
            workout_repo
                .add_exercise(
                    workout.id,
                    exercise.id,
                    Some(4),
                    Some(10),
                    Some(weight),
                    None,
                    Some(90),
                )
                .await?;
        }

        workout_index += 1;
    }
    tracing::info!("Demo workout history seeded");

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = setup_test_db();
        seed_initial_data(&pool).await.unwrap();
        seed_initial_data(&pool).await.unwrap();

        assert_eq!(UserRepository::new(pool.clone()).count().await.unwrap(), 1);
        assert_eq!(
            ExerciseRepository::new(pool.clone()).count().await.unwrap(),
            4
        );
        assert_eq!(QuoteRepository::new(pool.clone()).count().await.unwrap(), 5);
        assert_eq!(MetricRepository::new(pool).count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seed_challenges_for_today() {
        let pool = setup_test_db();
        seed_initial_data(&pool).await.unwrap();

        let today = Local::now().date_naive();
        let repo = ChallengeRepository::new(pool);
        assert_eq!(repo.count_for_date(today).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_demo_data_patches_user_and_backfills() {
        let pool = setup_test_db();
        seed_initial_data(&pool).await.unwrap();

        let user = apply_demo_data(&pool).await.unwrap().unwrap();
        assert_eq!(user.level, 12);
        assert_eq!(user.total_xp, 18500);
        assert_eq!(user.current_streak, 8);

        let stats = WorkoutRepository::new(pool.clone())
            .stats_for_user(user.id)
            .await
            .unwrap();
        assert_eq!(stats.total_workouts, 20);
        assert!(stats.total_volume > 0.0);

        // Second application leaves the history alone
        apply_demo_data(&pool).await.unwrap();
        let stats = WorkoutRepository::new(pool)
            .stats_for_user(user.id)
            .await
            .unwrap();
        assert_eq!(stats.total_workouts, 20);
    }

    #[tokio::test]
    async fn test_demo_data_without_user() {
        let pool = setup_test_db();
        assert!(apply_demo_data(&pool).await.unwrap().is_none());
    }
}
