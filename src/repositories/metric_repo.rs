use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, HealthMetric, MetricKind};

#[derive(Clone)]
pub struct MetricRepository {
    pool: DbPool,
}

impl MetricRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM health_metrics", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn log(
        &self,
        user_id: i64,
        kind: MetricKind,
        value: f64,
        unit: &str,
        date: NaiveDate,
    ) -> Result<HealthMetric> {
        let pool = self.pool.clone();
        let unit = unit.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO health_metrics (user_id, type, value, unit, date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![user_id, kind.as_str(), value, unit, date, now],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM health_metrics WHERE id = ?")?;
            let metric = stmt.query_row([id], HealthMetric::from_row)?;
            Ok(metric)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn for_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<HealthMetric>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM health_metrics WHERE user_id = ? AND date = ? ORDER BY type, id",
            )?;
            let metrics = stmt
                .query_map(rusqlite::params![user_id, date], HealthMetric::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(metrics)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Most recent reading of one metric, e.g. body weight for the
    /// calorie estimate.
    pub async fn latest(&self, user_id: i64, kind: MetricKind) -> Result<Option<HealthMetric>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM health_metrics
                 WHERE user_id = ? AND type = ?
                 ORDER BY date DESC, id DESC
                 LIMIT 1",
            )?;
            let result = stmt
                .query_row(
                    rusqlite::params![user_id, kind.as_str()],
                    HealthMetric::from_row,
                )
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Readings of one metric oldest-first, for trend views.
    pub async fn history(
        &self,
        user_id: i64,
        kind: MetricKind,
        limit: i64,
    ) -> Result<Vec<HealthMetric>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM (
                     SELECT * FROM health_metrics
                     WHERE user_id = ? AND type = ?
                     ORDER BY date DESC, id DESC
                     LIMIT ?
                 ) ORDER BY date, id",
            )?;
            let metrics = stmt
                .query_map(
                    rusqlite::params![user_id, kind.as_str(), limit],
                    HealthMetric::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(metrics)
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

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_log_and_for_date() {
        let (pool, user_id) = setup().await;
        let repo = MetricRepository::new(pool);

        repo.log(user_id, MetricKind::Steps, 2390.0, "count", day(15))
            .await
            .unwrap();
        repo.log(user_id, MetricKind::WaterIntake, 1000.0, "ml", day(15))
            .await
            .unwrap();
        repo.log(user_id, MetricKind::Weight, 70.0, "kg", day(14))
            .await
            .unwrap();

        let today = repo.for_date(user_id, day(15)).await.unwrap();
        assert_eq!(today.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_latest_picks_most_recent() {
        let (pool, user_id) = setup().await;
        let repo = MetricRepository::new(pool);

        repo.log(user_id, MetricKind::Weight, 72.0, "kg", day(10))
            .await
            .unwrap();
        repo.log(user_id, MetricKind::Weight, 70.5, "kg", day(14))
            .await
            .unwrap();

        let latest = repo.latest(user_id, MetricKind::Weight).await.unwrap().unwrap();
        assert_eq!(latest.value, 70.5);

        assert!(repo
            .latest(user_id, MetricKind::Sleep)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_history_oldest_first() {
        let (pool, user_id) = setup().await;
        let repo = MetricRepository::new(pool);

        for (d, v) in [(10, 72.0), (12, 71.2), (14, 70.5)] {
            repo.log(user_id, MetricKind::Weight, v, "kg", day(d))
                .await
                .unwrap();
        }

        let history = repo.history(user_id, MetricKind::Weight, 10).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value, 72.0);
        assert_eq!(history[2].value, 70.5);

        let limited = repo.history(user_id, MetricKind::Weight, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].value, 71.2);
    }
}
