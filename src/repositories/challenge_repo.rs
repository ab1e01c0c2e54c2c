use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ChallengeKind, ChallengeProgress, DailyChallenge, FromSqliteRow};

#[derive(Clone)]
pub struct ChallengeRepository {
    pool: DbPool,
}

impl ChallengeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        description: &str,
        kind: ChallengeKind,
        target: i64,
        xp_reward: i64,
        date: NaiveDate,
    ) -> Result<DailyChallenge> {
        let pool = self.pool.clone();
        let title = title.to_string();
        let description = description.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO daily_challenges (title, description, type, target, xp_reward, date, is_active)
                 VALUES (?, ?, ?, ?, ?, ?, 1)",
                rusqlite::params![title, description, kind.as_str(), target, xp_reward, date],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM daily_challenges WHERE id = ?")?;
            let challenge = stmt.query_row([id], DailyChallenge::from_row)?;
            Ok(challenge)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DailyChallenge>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM daily_challenges WHERE id = ?")?;
            let result = stmt.query_row([id], DailyChallenge::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn count_for_date(&self, date: NaiveDate) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM daily_challenges WHERE date = ?",
                [date],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Active challenges for a day joined with the user's progress.
    /// Challenges the user hasn't touched yet come back at zero.
    pub async fn progress_for_user(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ChallengeProgress>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT dc.*, COALESCE(uc.progress, 0) AS user_progress,
                        COALESCE(uc.is_completed, 0) AS user_completed
                 FROM daily_challenges dc
                 LEFT JOIN user_challenges uc
                        ON uc.challenge_id = dc.id AND uc.user_id = ?
                 WHERE dc.date = ? AND dc.is_active = 1
                 ORDER BY dc.id",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, date], |row| {
                    Ok(ChallengeProgress {
                        challenge: DailyChallenge::from_row(row)?,
                        progress: row.get("user_progress")?,
                        is_completed: row.get("user_completed")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Add progress toward a challenge, capping at its target. Returns
    /// the updated progress and whether this call first reached the
    /// target, so callers can award the XP exactly once.
    pub async fn record_progress(
        &self,
        user_id: i64,
        challenge_id: i64,
        amount: i64,
    ) -> Result<(ChallengeProgress, bool)> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM daily_challenges WHERE id = ?")?;
            let challenge = stmt
                .query_row([challenge_id], DailyChallenge::from_row)
                .optional()?
                .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

            let existing: Option<(i64, bool)> = conn
                .query_row(
                    "SELECT progress, is_completed FROM user_challenges
                     WHERE user_id = ? AND challenge_id = ?",
                    rusqlite::params![user_id, challenge_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let (old_progress, was_completed) = existing.unwrap_or((0, false));
            let progress = (old_progress + amount.max(0)).min(challenge.target);
            let is_completed = was_completed || progress >= challenge.target;
            let newly_completed = is_completed && !was_completed;
            let completed_at = if newly_completed { Some(now) } else { None };

            conn.execute(
                "INSERT INTO user_challenges (user_id, challenge_id, progress, is_completed, completed_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(user_id, challenge_id)
                 DO UPDATE SET progress = excluded.progress,
                               is_completed = excluded.is_completed,
                               completed_at = COALESCE(user_challenges.completed_at, excluded.completed_at)",
                rusqlite::params![user_id, challenge_id, progress, is_completed, completed_at],
            )?;

            Ok((
                ChallengeProgress {
                    challenge,
                    progress,
                    is_completed,
                },
                newly_completed,
            ))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::repositories::UserRepository;

    async fn setup() -> (DbPool, i64) {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        let user = UserRepository::new(pool.clone())
            .create("Test", None)
            .await
            .unwrap();
        (pool, user.id)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn test_progress_for_user_defaults_to_zero() {
        let (pool, user_id) = setup().await;
        let repo = ChallengeRepository::new(pool);

        repo.create(
            "Push Up Challenge",
            "Complete 100 push-ups today",
            ChallengeKind::Workout,
            100,
            100,
            today(),
        )
        .await
        .unwrap();

        let progress = repo.progress_for_user(user_id, today()).await.unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].progress, 0);
        assert!(!progress[0].is_completed);
    }

    #[tokio::test]
    async fn test_record_progress_caps_at_target() {
        let (pool, user_id) = setup().await;
        let repo = ChallengeRepository::new(pool);

        let challenge = repo
            .create(
                "Water Intake",
                "Drink 2000ml of water today",
                ChallengeKind::Water,
                2000,
                30,
                today(),
            )
            .await
            .unwrap();

        let (progress, newly) = repo
            .record_progress(user_id, challenge.id, 1500)
            .await
            .unwrap();
        assert_eq!(progress.progress, 1500);
        assert!(!newly);

        let (progress, newly) = repo
            .record_progress(user_id, challenge.id, 5000)
            .await
            .unwrap();
        assert_eq!(progress.progress, 2000);
        assert!(progress.is_completed);
        assert!(newly);

        // Already completed: no second award
        let (progress, newly) = repo
            .record_progress(user_id, challenge.id, 100)
            .await
            .unwrap();
        assert_eq!(progress.progress, 2000);
        assert!(!newly);
    }

    #[tokio::test]
    async fn test_record_progress_unknown_challenge() {
        let (pool, user_id) = setup().await;
        let repo = ChallengeRepository::new(pool);
        assert!(repo.record_progress(user_id, 404, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_challenges_scoped_by_date() {
        let (pool, user_id) = setup().await;
        let repo = ChallengeRepository::new(pool);

        repo.create("Today", "d", ChallengeKind::Workout, 10, 50, today())
            .await
            .unwrap();
        repo.create(
            "Yesterday",
            "d",
            ChallengeKind::Workout,
            10,
            50,
            today().pred_opt().unwrap(),
        )
        .await
        .unwrap();

        let progress = repo.progress_for_user(user_id, today()).await.unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].challenge.title, "Today");
        assert_eq!(repo.count_for_date(today()).await.unwrap(), 1);
    }
}
