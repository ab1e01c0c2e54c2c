use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{dashboard, health, profile, stats, workouts};

pub fn create_router(
    dashboard_state: dashboard::DashboardState,
    workouts_state: workouts::WorkoutsState,
    stats_state: stats::StatsState,
    profile_state: profile::ProfileState,
) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(dashboard::index))
        .route(
            "/challenges/{id}/progress",
            post(dashboard::log_challenge_progress),
        )
        .route("/metrics", post(dashboard::log_metric))
        .with_state(dashboard_state)
        // Workout library and live player
        .route("/workouts", get(workouts::library))
        .route("/workouts/{id}/start", post(workouts::start))
        .route("/workouts/live", get(workouts::live))
        .route("/workouts/live/complete-set", post(workouts::complete_set))
        .route("/workouts/live/skip", post(workouts::skip_exercise))
        .route("/workouts/live/pause", post(workouts::pause))
        .route("/workouts/live/resume", post(workouts::resume))
        .route("/workouts/live/end", post(workouts::end))
        .with_state(workouts_state)
        // Stats tabs
        .route("/stats", get(stats::index))
        .route("/stats/overview", get(stats::overview))
        .route("/stats/progress", get(stats::progress))
        .route("/stats/records", get(stats::records))
        .with_state(stats_state)
        // Profile
        .route("/profile", get(profile::index))
        .route("/profile/preferences", post(profile::update_preferences))
        .route("/profile/demo-data", post(profile::apply_demo_data))
        .with_state(profile_state)
        // Health check
        .route("/healthz", get(health::health_check))
}
