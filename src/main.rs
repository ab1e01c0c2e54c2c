use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use getjacked::config::Config;
use getjacked::handlers::{dashboard, profile, stats, workouts};
use getjacked::repositories::{
    ChallengeRepository, MetricRepository, QuoteRepository, UserRepository, WorkoutRepository,
};
use getjacked::{db, migrations, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "getjacked=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url)?;

    // Run migrations
    migrations::run_migrations(&pool)?;

    // Seed initial data; failures are logged but never fatal
    if let Err(e) = seed::seed_initial_data(&pool).await {
        tracing::error!("Seeding initial data failed: {}", e);
    }

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let challenge_repo = ChallengeRepository::new(pool.clone());
    let metric_repo = MetricRepository::new(pool.clone());
    let quote_repo = QuoteRepository::new(pool.clone());

    // Create handler states
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
        user_repo: user_repo.clone(),
        pool: pool.clone(),
    };

    // Build router
    let app = routes::create_router(dashboard_state, workouts_state, stats_state, profile_state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
