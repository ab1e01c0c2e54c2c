pub mod challenge;
pub mod exercise;
pub mod from_row;
pub mod health_metric;
pub mod quote;
pub mod template;
pub mod user;
pub mod workout;

pub use challenge::{ChallengeKind, ChallengeProgress, DailyChallenge, UserChallenge};
pub use exercise::Exercise;
pub use from_row::FromSqliteRow;
pub use health_metric::{HealthMetric, MetricKind};
pub use quote::MotivationalQuote;
pub use template::{TemplateExercise, WorkoutTemplate, TEMPLATES};
pub use user::User;
pub use workout::{Difficulty, NewWorkout, Workout, WorkoutExercise, WorkoutType};
