use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::workout::Difficulty;
use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub difficulty: Difficulty,
    pub xp_value: i64,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let muscle_groups_json: String = row.get("muscle_groups")?;
        let difficulty_str: String = row.get("difficulty")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            // Stored as a JSON array; tolerate rows written by hand.
            muscle_groups: serde_json::from_str(&muscle_groups_json).unwrap_or_default(),
            instructions: row.get("instructions")?,
            difficulty: Difficulty::parse(&difficulty_str),
            xp_value: row.get("xp_value")?,
        })
    }
}
