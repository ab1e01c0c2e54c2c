use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Weight,
    BodyFat,
    MuscleMass,
    WaterIntake,
    Sleep,
    Steps,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Weight => "weight",
            MetricKind::BodyFat => "body_fat",
            MetricKind::MuscleMass => "muscle_mass",
            MetricKind::WaterIntake => "water_intake",
            MetricKind::Sleep => "sleep",
            MetricKind::Steps => "steps",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weight" => Some(MetricKind::Weight),
            "body_fat" => Some(MetricKind::BodyFat),
            "muscle_mass" => Some(MetricKind::MuscleMass),
            "water_intake" => Some(MetricKind::WaterIntake),
            "sleep" => Some(MetricKind::Sleep),
            "steps" => Some(MetricKind::Steps),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Weight => "Weight",
            MetricKind::BodyFat => "Body Fat",
            MetricKind::MuscleMass => "Muscle Mass",
            MetricKind::WaterIntake => "Water",
            MetricKind::Sleep => "Sleep",
            MetricKind::Steps => "Steps",
        }
    }

    /// Unit recorded when the caller doesn't supply one.
    pub fn default_unit(&self) -> &'static str {
        match self {
            MetricKind::Weight => "kg",
            MetricKind::BodyFat => "%",
            MetricKind::MuscleMass => "kg",
            MetricKind::WaterIntake => "ml",
            MetricKind::Sleep => "hours",
            MetricKind::Steps => "count",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub value: f64,
    pub unit: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl HealthMetric {
    pub fn display_name(&self) -> &'static str {
        MetricKind::parse(&self.kind)
            .map(|k| k.display_name())
            .unwrap_or("Metric")
    }

    /// Whole-number metrics (steps, ml) read better without decimals.
    pub fn value_display(&self) -> String {
        if self.value.fract() == 0.0 {
            format!("{}", self.value as i64)
        } else {
            format!("{:.1}", self.value)
        }
    }
}

impl FromSqliteRow for HealthMetric {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            kind: row.get("type")?,
            value: row.get("value")?,
            unit: row.get("unit")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }
}
