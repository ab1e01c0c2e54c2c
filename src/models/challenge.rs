use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    #[default]
    Workout,
    Steps,
    Calories,
    Water,
}

impl ChallengeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeKind::Workout => "workout",
            ChallengeKind::Steps => "steps",
            ChallengeKind::Calories => "calories",
            ChallengeKind::Water => "water",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "steps" => ChallengeKind::Steps,
            "calories" => ChallengeKind::Calories,
            "water" => ChallengeKind::Water,
            _ => ChallengeKind::Workout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub kind: ChallengeKind,
    pub target: i64,
    pub xp_reward: i64,
    pub date: NaiveDate,
    pub is_active: bool,
}

impl FromSqliteRow for DailyChallenge {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind_str: String = row.get("type")?;
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            kind: ChallengeKind::parse(&kind_str),
            target: row.get("target")?,
            xp_reward: row.get("xp_reward")?,
            date: row.get("date")?,
            is_active: row.get("is_active")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChallenge {
    pub id: i64,
    pub user_id: i64,
    pub challenge_id: i64,
    pub progress: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl FromSqliteRow for UserChallenge {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            challenge_id: row.get("challenge_id")?,
            progress: row.get("progress")?,
            is_completed: row.get("is_completed")?,
            completed_at: row.get("completed_at")?,
        })
    }
}

/// A daily challenge joined with the user's progress toward it.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeProgress {
    pub challenge: DailyChallenge,
    pub progress: i64,
    pub is_completed: bool,
}

impl ChallengeProgress {
    pub fn progress_pct(&self) -> i64 {
        if self.challenge.target <= 0 {
            return 0;
        }
        (self.progress * 100 / self.challenge.target).clamp(0, 100)
    }
}
