use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Strength,
    Cardio,
    Hiit,
    Core,
    Stretching,
    Bodyweight,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Hiit => "hiit",
            WorkoutType::Core => "core",
            WorkoutType::Stretching => "stretching",
            WorkoutType::Bodyweight => "bodyweight",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cardio" => WorkoutType::Cardio,
            "hiit" => WorkoutType::Hiit,
            "core" => WorkoutType::Core,
            "stretching" => WorkoutType::Stretching,
            "bodyweight" => WorkoutType::Bodyweight,
            _ => WorkoutType::Strength,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "Strength",
            WorkoutType::Cardio => "Cardio",
            WorkoutType::Hiit => "HIIT",
            WorkoutType::Core => "Core",
            WorkoutType::Stretching => "Stretching",
            WorkoutType::Bodyweight => "Bodyweight",
        }
    }

    /// Metabolic equivalent used by the calorie estimate
    /// (MET x weight-kg x hours).
    pub fn met(&self) -> f64 {
        match self {
            WorkoutType::Strength => 6.0,
            WorkoutType::Cardio => 8.0,
            WorkoutType::Hiit => 10.0,
            WorkoutType::Core => 4.5,
            WorkoutType::Stretching => 2.5,
            WorkoutType::Bodyweight => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Beginner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub workout_type: WorkoutType,
    pub duration: Option<i64>,
    pub calories_burned: Option<i64>,
    pub xp_earned: i64,
    pub difficulty: Difficulty,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let type_str: String = row.get("type")?;
        let difficulty_str: String = row.get("difficulty")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            workout_type: WorkoutType::parse(&type_str),
            duration: row.get("duration")?,
            calories_burned: row.get("calories_burned")?,
            xp_earned: row.get("xp_earned")?,
            difficulty: Difficulty::parse(&difficulty_str),
            is_completed: row.get("is_completed")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Payload for recording a workout row.
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub user_id: i64,
    pub name: String,
    pub workout_type: WorkoutType,
    pub duration: Option<i64>,
    pub calories_burned: Option<i64>,
    pub xp_earned: i64,
    pub difficulty: Difficulty,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One logged exercise within a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub rest_time: Option<i64>,
    pub is_completed: bool,
}

impl FromSqliteRow for WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_id: row.get("exercise_id")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            duration: row.get("duration")?,
            rest_time: row.get("rest_time")?,
            is_completed: row.get("is_completed")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_type_round_trip() {
        for t in [
            WorkoutType::Strength,
            WorkoutType::Cardio,
            WorkoutType::Hiit,
            WorkoutType::Core,
            WorkoutType::Stretching,
            WorkoutType::Bodyweight,
        ] {
            assert_eq!(WorkoutType::parse(t.as_str()), t);
        }
        assert_eq!(WorkoutType::parse("unknown"), WorkoutType::Strength);
    }

    #[test]
    fn test_met_values() {
        assert_eq!(WorkoutType::Hiit.met(), 10.0);
        assert_eq!(WorkoutType::Stretching.met(), 2.5);
        assert_eq!(WorkoutType::Strength.met(), 6.0);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("advanced"), Difficulty::Advanced);
        assert_eq!(Difficulty::parse(""), Difficulty::Beginner);
    }
}
