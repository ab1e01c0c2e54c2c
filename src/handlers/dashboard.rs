use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{ChallengeProgress, HealthMetric, MetricKind, User};
use crate::repositories::{
    ChallengeRepository, MetricRepository, QuoteRepository, UserRepository, WorkoutRepository,
};

const CALENDAR_DAYS: i64 = 28;

#[derive(Clone)]
pub struct DashboardState {
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
    pub challenge_repo: ChallengeRepository,
    pub metric_repo: MetricRepository,
    pub quote_repo: QuoteRepository,
}

struct WeekDay {
    day_name: &'static str,
    day_num: u32,
    is_today: bool,
}

struct CalendarDay {
    day_num: u32,
    count: i64,
}

struct MetricView {
    label: &'static str,
    value: String,
    unit: String,
}

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    user: User,
    week: Vec<WeekDay>,
    challenges: Vec<ChallengeProgress>,
    total_workouts: i64,
    total_minutes: i64,
    volume_display: String,
    metrics: Vec<MetricView>,
    quote_text: String,
    quote_author: String,
    streak_dots: i64,
    calendar: Vec<CalendarDay>,
    active_days: i64,
    consistency_pct: i64,
}

fn current_week(today: NaiveDate) -> Vec<WeekDay> {
    const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    let start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            WeekDay {
                day_name: DAY_NAMES[date.weekday().num_days_from_sunday() as usize],
                day_num: date.day(),
                is_today: date == today,
            }
        })
        .collect()
}

fn metric_view(metric: &HealthMetric) -> MetricView {
    MetricView {
        label: metric.display_name(),
        value: metric.value_display(),
        unit: metric.unit.clone(),
    }
}

pub async fn index(State(state): State<DashboardState>) -> Result<Response> {
    let user = state
        .user_repo
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let today = Local::now().date_naive();
    let challenges = state.challenge_repo.progress_for_user(user.id, today).await?;
    let stats = state.workout_repo.stats_for_user(user.id).await?;
    let metrics = state.metric_repo.for_date(user.id, today).await?;
    let quote = state.quote_repo.quote_of_day(today).await?;

    let since = today - Duration::days(CALENDAR_DAYS - 1);
    let counts = state.workout_repo.counts_by_day(user.id, since).await?;
    let by_day: HashMap<NaiveDate, i64> = counts.iter().map(|c| (c.date, c.count)).collect();
    let calendar: Vec<CalendarDay> = (0..CALENDAR_DAYS)
        .map(|i| {
            let date = since + Duration::days(i);
            CalendarDay {
                day_num: date.day(),
                count: by_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();
    let active_days = calendar.iter().filter(|d| d.count > 0).count() as i64;
    let consistency_pct = (active_days * 100 + CALENDAR_DAYS / 2) / CALENDAR_DAYS;

    let (quote_text, quote_author) = quote
        .map(|q| (q.text.clone(), q.author_display().to_string()))
        .unwrap_or_default();

    let template = DashboardTemplate {
        week: current_week(today),
        challenges,
        total_workouts: stats.total_workouts,
        total_minutes: stats.total_minutes,
        volume_display: format!("{:.1}", stats.total_volume),
        metrics: metrics.iter().map(metric_view).collect(),
        quote_text,
        quote_author,
        streak_dots: user.current_streak.clamp(0, 8),
        calendar,
        active_days,
        consistency_pct,
        user,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

#[derive(Deserialize)]
pub struct ProgressForm {
    pub amount: i64,
}

pub async fn log_challenge_progress(
    State(state): State<DashboardState>,
    Path(challenge_id): Path<i64>,
    Form(form): Form<ProgressForm>,
) -> Result<Response> {
    if form.amount <= 0 {
        return Err(AppError::BadRequest(
            "Progress amount must be positive".to_string(),
        ));
    }

    let user = state
        .user_repo
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let (progress, newly_completed) = state
        .challenge_repo
        .record_progress(user.id, challenge_id, form.amount)
        .await?;

    if newly_completed {
        state
            .user_repo
            .add_xp(user.id, progress.challenge.xp_reward)
            .await?;
        tracing::info!(
            challenge = %progress.challenge.title,
            xp = progress.challenge.xp_reward,
            "Challenge completed"
        );
    }

    Ok(Redirect::to("/").into_response())
}

#[derive(Deserialize)]
pub struct MetricForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub unit: Option<String>,
}

pub async fn log_metric(
    State(state): State<DashboardState>,
    Form(form): Form<MetricForm>,
) -> Result<Response> {
    let kind = MetricKind::parse(&form.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown metric type: {}", form.kind)))?;
    if !form.value.is_finite() || form.value < 0.0 {
        return Err(AppError::BadRequest(
            "Metric value must be non-negative".to_string(),
        ));
    }

    let user = state
        .user_repo
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let unit = form
        .unit
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| kind.default_unit().to_string());
    state
        .metric_repo
        .log(user.id, kind, form.value, &unit, Local::now().date_naive())
        .await?;

    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_week_starts_sunday() {
        // 2024-01-17 is a Wednesday
        let week = current_week(NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day_name, "Sun");
        assert_eq!(week[0].day_num, 14);
        assert_eq!(week[6].day_name, "Sat");
        assert!(week[3].is_today);
    }
}
