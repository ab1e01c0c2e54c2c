use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::user::level_for_xp;
use crate::models::{FromSqliteRow, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The app is single-user; the current user is the first row.
    pub async fn current(&self) -> Result<Option<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id LIMIT 1")?;
            let result = stmt.query_row([], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, name: &str, email: Option<&str>) -> Result<User> {
        let pool = self.pool.clone();
        let name = name.to_string();
        let email = email.map(|s| s.to_string());
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (name, email, level, total_xp, current_streak, longest_streak, created_at, updated_at)
                 VALUES (?, ?, 1, 0, 0, 0, ?, ?)",
                rusqlite::params![name, email, now, now],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let user = stmt.query_row([id], User::from_row)?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Add XP and recompute the level from the fixed per-level step.
    /// The level never goes down, so demo-patched profiles keep their
    /// displayed level.
    pub async fn add_xp(&self, id: i64, amount: i64) -> Result<User> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let user = stmt
                .query_row([id], User::from_row)
                .optional()?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

            let total_xp = user.total_xp + amount.max(0);
            let level = user.level.max(level_for_xp(total_xp));

            conn.execute(
                "UPDATE users SET total_xp = ?, level = ?, updated_at = ? WHERE id = ?",
                rusqlite::params![total_xp, level, now, id],
            )?;

            let user = stmt.query_row([id], User::from_row)?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Patch the profile with canned demo values.
    pub async fn apply_demo_profile(&self, id: i64) -> Result<User> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE users
                 SET level = 12, total_xp = 18500, current_streak = 8, longest_streak = 15, updated_at = ?
                 WHERE id = ?",
                rusqlite::params![now, id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound("User not found".to_string()));
            }
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let user = stmt.query_row([id], User::from_row)?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
