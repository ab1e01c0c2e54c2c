use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::response::Response;
use axum::Router;

use getjacked::db::{create_memory_pool, DbPool};
use getjacked::handlers::{dashboard, profile, stats, workouts};
use getjacked::migrations::run_migrations_for_tests;
use getjacked::models::User;
use getjacked::repositories::{
    ChallengeRepository, MetricRepository, QuoteRepository, UserRepository, WorkoutRepository,
};
use getjacked::routes;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let challenge_repo = ChallengeRepository::new(pool.clone());
    let metric_repo = MetricRepository::new(pool.clone());
    let quote_repo = QuoteRepository::new(pool.clone());

    let dashboard_state = dashboard::DashboardState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
        challenge_repo: challenge_repo.clone(),
        metric_repo: metric_repo.clone(),
        quote_repo: quote_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        user_repo: user_repo.clone(),
        metric_repo: metric_repo.clone(),
        live: Arc::new(Mutex::new(None)),
    };
    let stats_state = stats::StatsState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
        metric_repo: metric_repo.clone(),
    };
    let profile_state = profile::ProfileState {
        user_repo,
        pool,
    };

    routes::create_router(dashboard_state, workouts_state, stats_state, profile_state)
}

/// Seed the same initial data the binary seeds at startup.
#[allow(dead_code)]
pub async fn seed_app(pool: &DbPool) {
    getjacked::seed::seed_initial_data(pool)
        .await
        .expect("Failed to seed initial data");
}

#[allow(dead_code)]
pub async fn current_user(pool: &DbPool) -> User {
    UserRepository::new(pool.clone())
        .current()
        .await
        .unwrap()
        .expect("No user seeded")
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[allow(dead_code)]
pub fn form_request(uri: &str, body: &str) -> http::Request<Body> {
    http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> http::Request<Body> {
    http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
