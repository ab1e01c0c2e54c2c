use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationalQuote {
    pub id: i64,
    pub text: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
}

impl MotivationalQuote {
    pub fn author_display(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }
}

impl FromSqliteRow for MotivationalQuote {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            text: row.get("text")?,
            author: row.get("author")?,
            category: row.get("category")?,
            is_active: row.get("is_active")?,
        })
    }
}
