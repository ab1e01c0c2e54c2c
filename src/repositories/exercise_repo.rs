use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Difficulty, Exercise, FromSqliteRow};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all(&self) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises ORDER BY category, name")?;
            let exercises = stmt
                .query_map([], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_category(&self, category: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let category = category.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM exercises WHERE category = ? ORDER BY name")?;
            let exercises = stmt
                .query_map([&category], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        name: &str,
        category: &str,
        muscle_groups: &[&str],
        instructions: Option<&str>,
        difficulty: Difficulty,
        xp_value: i64,
    ) -> Result<Exercise> {
        let pool = self.pool.clone();
        let name = name.to_string();
        let category = category.to_string();
        let muscle_groups_json = serde_json::to_string(muscle_groups)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let instructions = instructions.map(|s| s.to_string());

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (name, category, muscle_groups, instructions, difficulty, xp_value)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    name,
                    category,
                    muscle_groups_json,
                    instructions,
                    difficulty.as_str(),
                    xp_value
                ],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let exercise = stmt.query_row([id], Exercise::from_row)?;
            Ok(exercise)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
