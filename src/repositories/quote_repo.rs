use chrono::{Datelike, NaiveDate};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, MotivationalQuote};

#[derive(Clone)]
pub struct QuoteRepository {
    pool: DbPool,
}

impl QuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM motivational_quotes",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        text: &str,
        author: Option<&str>,
        category: Option<&str>,
    ) -> Result<MotivationalQuote> {
        let pool = self.pool.clone();
        let text = text.to_string();
        let author = author.map(|s| s.to_string());
        let category = category.map(|s| s.to_string());

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO motivational_quotes (text, author, category, is_active)
                 VALUES (?, ?, ?, 1)",
                rusqlite::params![text, author, category],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare("SELECT * FROM motivational_quotes WHERE id = ?")?;
            let quote = stmt.query_row([id], MotivationalQuote::from_row)?;
            Ok(quote)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn active(&self) -> Result<Vec<MotivationalQuote>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare("SELECT * FROM motivational_quotes WHERE is_active = 1 ORDER BY id")?;
            let quotes = stmt
                .query_map([], MotivationalQuote::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(quotes)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Quote of the day: day-of-year modulo the active quote count, so
    /// the pick is stable within a day and rotates across the year.
    pub async fn quote_of_day(&self, date: NaiveDate) -> Result<Option<MotivationalQuote>> {
        let quotes = self.active().await?;
        if quotes.is_empty() {
            return Ok(None);
        }
        let index = date.ordinal0() as usize % quotes.len();
        Ok(quotes.into_iter().nth(index))
    }
}
