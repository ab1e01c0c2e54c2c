pub mod challenge_repo;
pub mod exercise_repo;
pub mod metric_repo;
pub mod quote_repo;
pub mod user_repo;
pub mod workout_repo;

pub use challenge_repo::ChallengeRepository;
pub use exercise_repo::ExerciseRepository;
pub use metric_repo::MetricRepository;
pub use quote_repo::QuoteRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;
