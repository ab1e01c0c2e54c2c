use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use serde::Serialize;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, NewWorkout, Workout, WorkoutExercise, WorkoutType};

/// Lifetime totals over completed workouts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: i64,
    pub total_minutes: i64,
    pub total_volume: f64,
}

/// Completed workouts per calendar day, for calendars and heatmaps.
#[derive(Debug, Clone, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayVolume {
    pub date: NaiveDate,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopExercise {
    pub name: String,
    pub sessions: i64,
    pub volume: f64,
}

/// Heaviest weight ever logged for an exercise.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub weight: f64,
    pub date: NaiveDate,
}

/// Best set weight per exercise per workout, date-ordered.
#[derive(Debug, Clone, Serialize)]
pub struct BestSet {
    pub name: String,
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitShare {
    pub workout_type: WorkoutType,
    pub sessions: i64,
}

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewWorkout) -> Result<Workout> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workouts (user_id, name, type, duration, calories_burned, xp_earned, difficulty, is_completed, completed_at, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    new.user_id,
                    new.name,
                    new.workout_type.as_str(),
                    new.duration,
                    new.calories_burned,
                    new.xp_earned,
                    new.difficulty.as_str(),
                    new.is_completed,
                    new.completed_at,
                    new.created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let workout = stmt.query_row([id], Workout::from_row)?;
            Ok(workout)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn add_exercise(
        &self,
        workout_id: i64,
        exercise_id: i64,
        sets: Option<i64>,
        reps: Option<i64>,
        weight: Option<f64>,
        duration: Option<i64>,
        rest_time: Option<i64>,
    ) -> Result<WorkoutExercise> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_exercises (workout_id, exercise_id, sets, reps, weight, duration, rest_time, is_completed)
                 VALUES (?, ?, ?, ?, ?, ?, ?, 1)",
                rusqlite::params![workout_id, exercise_id, sets, reps, weight, duration, rest_time],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM workout_exercises WHERE id = ?")?;
            let entry = stmt.query_row([id], WorkoutExercise::from_row)?;
            Ok(entry)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn exercises_for(&self, workout_id: i64) -> Result<Vec<WorkoutExercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workout_exercises WHERE workout_id = ? ORDER BY id")?;
            let entries = stmt
                .query_map([workout_id], WorkoutExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Lifetime workout count, minutes, and volume
    /// (sum of weight x reps x sets) over completed workouts.
    pub async fn stats_for_user(&self, user_id: i64) -> Result<WorkoutStats> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let (total_workouts, total_minutes): (i64, i64) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration), 0)
                 FROM workouts WHERE user_id = ? AND is_completed = 1",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let total_volume: f64 = conn.query_row(
                "SELECT COALESCE(SUM(we.weight * we.reps * we.sets), 0)
                 FROM workout_exercises we
                 JOIN workouts w ON we.workout_id = w.id
                 WHERE w.user_id = ? AND w.is_completed = 1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(WorkoutStats {
                total_workouts,
                total_minutes,
                total_volume,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Completed workouts per day on or after `since`.
    pub async fn counts_by_day(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DayCount>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT date(created_at) AS day, COUNT(*)
                 FROM workouts
                 WHERE user_id = ? AND is_completed = 1 AND date(created_at) >= ?
                 GROUP BY day ORDER BY day",
            )?;
            let counts = stmt
                .query_map(rusqlite::params![user_id, since], |row| {
                    Ok(DayCount {
                        date: row.get(0)?,
                        count: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(counts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Volume lifted per day on or after `since`.
    pub async fn volume_by_day(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DayVolume>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT date(w.created_at) AS day, COALESCE(SUM(we.weight * we.reps * we.sets), 0)
                 FROM workout_exercises we
                 JOIN workouts w ON we.workout_id = w.id
                 WHERE w.user_id = ? AND w.is_completed = 1 AND date(w.created_at) >= ?
                 GROUP BY day ORDER BY day",
            )?;
            let volumes = stmt
                .query_map(rusqlite::params![user_id, since], |row| {
                    Ok(DayVolume {
                        date: row.get(0)?,
                        volume: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(volumes)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Exercises ranked by lifetime volume.
    pub async fn top_exercises(&self, user_id: i64, limit: i64) -> Result<Vec<TopExercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT e.name,
                        COUNT(DISTINCT we.workout_id),
                        COALESCE(SUM(we.weight * we.reps * we.sets), 0) AS volume
                 FROM workout_exercises we
                 JOIN workouts w ON we.workout_id = w.id
                 JOIN exercises e ON we.exercise_id = e.id
                 WHERE w.user_id = ? AND w.is_completed = 1
                 GROUP BY e.id
                 ORDER BY volume DESC
                 LIMIT ?",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], |row| {
                    Ok(TopExercise {
                        name: row.get(0)?,
                        sessions: row.get(1)?,
                        volume: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Heaviest logged weight per exercise, with the day it happened.
    pub async fn max_weight_records(&self, user_id: i64) -> Result<Vec<ExerciseRecord>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT e.name, MAX(we.weight) AS weight, date(w.created_at)
                 FROM workout_exercises we
                 JOIN workouts w ON we.workout_id = w.id
                 JOIN exercises e ON we.exercise_id = e.id
                 WHERE w.user_id = ? AND we.weight IS NOT NULL
                 GROUP BY e.id
                 ORDER BY weight DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ExerciseRecord {
                        name: row.get(0)?,
                        weight: row.get(1)?,
                        date: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Best set weight per exercise per workout, oldest first. The
    /// progress view folds these into first-vs-latest gains.
    pub async fn best_sets(&self, user_id: i64) -> Result<Vec<BestSet>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT e.name, date(w.created_at) AS day, MAX(we.weight)
                 FROM workout_exercises we
                 JOIN workouts w ON we.workout_id = w.id
                 JOIN exercises e ON we.exercise_id = e.id
                 WHERE w.user_id = ? AND we.weight IS NOT NULL
                 GROUP BY we.workout_id, e.id
                 ORDER BY day",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(BestSet {
                        name: row.get(0)?,
                        date: row.get(1)?,
                        weight: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Completed sessions grouped by workout type.
    pub async fn split_distribution(&self, user_id: i64) -> Result<Vec<SplitShare>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT type, COUNT(*) AS sessions
                 FROM workouts
                 WHERE user_id = ? AND is_completed = 1
                 GROUP BY type
                 ORDER BY sessions DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    let type_str: String = row.get(0)?;
                    Ok(SplitShare {
                        workout_type: WorkoutType::parse(&type_str),
                        sessions: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
