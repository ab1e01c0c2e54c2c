use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// XP needed to advance one level. Display progress is `total_xp`
/// modulo this step; awards recompute the level from the same step.
pub const LEVEL_XP_STEP: i64 = 1500;

pub fn level_for_xp(total_xp: i64) -> i64 {
    1 + total_xp.max(0) / LEVEL_XP_STEP
}

pub fn level_title(level: i64) -> &'static str {
    if level < 5 {
        "Beginner"
    } else if level < 10 {
        "Intermediate"
    } else if level < 20 {
        "Advanced"
    } else if level < 30 {
        "Expert"
    } else {
        "Master"
    }
}

pub fn level_icon(level: i64) -> &'static str {
    if level < 5 {
        "\u{1F331}" // seedling
    } else if level < 10 {
        "\u{1F4AA}" // flexed biceps
    } else if level < 20 {
        "\u{1F525}" // fire
    } else if level < 30 {
        "\u{26A1}" // high voltage
    } else {
        "\u{1F451}" // crown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub level: i64,
    pub total_xp: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn avatar_initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }

    pub fn level_title(&self) -> &'static str {
        level_title(self.level)
    }

    pub fn level_icon(&self) -> &'static str {
        level_icon(self.level)
    }

    pub fn xp_into_level(&self) -> i64 {
        self.total_xp.max(0) % LEVEL_XP_STEP
    }

    pub fn xp_for_next_level(&self) -> i64 {
        LEVEL_XP_STEP
    }

    pub fn level_progress_pct(&self) -> i64 {
        (self.xp_into_level() * 100 / LEVEL_XP_STEP).clamp(0, 100)
    }
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            level: row.get("level")?,
            total_xp: row.get("total_xp")?,
            current_streak: row.get("current_streak")?,
            longest_streak: row.get("longest_streak")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
