use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{MetricKind, User};
use crate::repositories::workout_repo::{BestSet, ExerciseRecord, SplitShare, WorkoutStats};
use crate::repositories::{MetricRepository, UserRepository, WorkoutRepository};

const HEATMAP_DAYS: i64 = 28;

#[derive(Clone)]
pub struct StatsState {
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
    pub metric_repo: MetricRepository,
}

pub async fn index() -> Redirect {
    Redirect::to("/stats/overview")
}

// Overview tab

struct VolumeBar {
    label: &'static str,
    volume: i64,
    pct: i64,
}

struct HeatCell {
    count: i64,
}

struct TopExerciseView {
    name: String,
    sessions: i64,
    volume_display: String,
    per_session_display: String,
    pct: i64,
}

#[derive(Template)]
#[template(path = "stats/overview.html")]
struct OverviewTemplate {
    total_workouts: i64,
    hours_display: String,
    volume_display: String,
    records_count: usize,
    weekly: Vec<VolumeBar>,
    heatmap: Vec<HeatCell>,
    consistency_pct: i64,
    top_exercises: Vec<TopExerciseView>,
}

pub async fn overview(State(state): State<StatsState>) -> Result<Response> {
    let user = current_user(&state.user_repo).await?;
    let today = Local::now().date_naive();

    let stats = state.workout_repo.stats_for_user(user.id).await?;
    let records = state.workout_repo.max_weight_records(user.id).await?;

    let week_start = today - Duration::days(6);
    let volumes = state.workout_repo.volume_by_day(user.id, week_start).await?;
    let by_day: HashMap<NaiveDate, f64> = volumes.iter().map(|v| (v.date, v.volume)).collect();
    let max_volume = by_day.values().cloned().fold(0.0_f64, f64::max).max(1.0);
    let weekly: Vec<VolumeBar> = (0..7)
        .map(|i| {
            let date = week_start + Duration::days(i);
            let volume = by_day.get(&date).copied().unwrap_or(0.0);
            VolumeBar {
                label: weekday_label(date),
                volume: volume.round() as i64,
                pct: (volume / max_volume * 100.0).round() as i64,
            }
        })
        .collect();

    let heat_start = today - Duration::days(HEATMAP_DAYS - 1);
    let counts = state.workout_repo.counts_by_day(user.id, heat_start).await?;
    let count_by_day: HashMap<NaiveDate, i64> = counts.iter().map(|c| (c.date, c.count)).collect();
    let heatmap: Vec<HeatCell> = (0..HEATMAP_DAYS)
        .map(|i| HeatCell {
            count: count_by_day
                .get(&(heat_start + Duration::days(i)))
                .copied()
                .unwrap_or(0),
        })
        .collect();
    let active_days = heatmap.iter().filter(|c| c.count > 0).count() as i64;
    let consistency_pct = (active_days * 100 + HEATMAP_DAYS / 2) / HEATMAP_DAYS;

    let top = state.workout_repo.top_exercises(user.id, 5).await?;
    let max_top = top.iter().map(|t| t.volume).fold(0.0_f64, f64::max).max(1.0);
    let top_exercises = top
        .iter()
        .map(|t| TopExerciseView {
            name: t.name.clone(),
            sessions: t.sessions,
            volume_display: format!("{:.0}", t.volume),
            per_session_display: format!("{:.0}", t.volume / t.sessions.max(1) as f64),
            pct: (t.volume / max_top * 100.0).round() as i64,
        })
        .collect();

    let template = OverviewTemplate {
        total_workouts: stats.total_workouts,
        hours_display: format!("{}h", stats.total_minutes / 60),
        volume_display: format!("{:.1}", stats.total_volume),
        records_count: records.len(),
        weekly,
        heatmap,
        consistency_pct,
        top_exercises,
    };
    render(template)
}

// Progress tab

struct WeightPoint {
    date_label: String,
    value_display: String,
    pct: i64,
}

struct ProgressionView {
    name: String,
    first_display: String,
    latest_display: String,
    gain_display: String,
    gain_pct_display: String,
    improved: bool,
}

#[derive(Template)]
#[template(path = "stats/progress.html")]
struct ProgressTemplate {
    weight_points: Vec<WeightPoint>,
    weight_delta: String,
    progressions: Vec<ProgressionView>,
}

/// Fold date-ordered best sets into first-vs-latest gains per exercise,
/// keeping first-appearance order.
fn fold_progressions(best_sets: &[BestSet]) -> Vec<(String, f64, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut spans: HashMap<String, (f64, f64)> = HashMap::new();
    for set in best_sets {
        match spans.get_mut(&set.name) {
            Some((_, latest)) => *latest = set.weight,
            None => {
                order.push(set.name.clone());
                spans.insert(set.name.clone(), (set.weight, set.weight));
            }
        }
    }
    order
        .into_iter()
        .map(|name| {
            let (first, latest) = spans[&name];
            (name, first, latest)
        })
        .collect()
}

pub async fn progress(State(state): State<StatsState>) -> Result<Response> {
    let user = current_user(&state.user_repo).await?;

    let weights = state
        .metric_repo
        .history(user.id, MetricKind::Weight, 12)
        .await?;
    let max_weight = weights
        .iter()
        .map(|m| m.value)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let weight_points: Vec<WeightPoint> = weights
        .iter()
        .map(|m| WeightPoint {
            date_label: m.date.format("%b %d").to_string(),
            value_display: m.value_display(),
            pct: (m.value / max_weight * 100.0).round() as i64,
        })
        .collect();
    let weight_delta = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) if weights.len() > 1 => {
            format!("{:+.1} kg", last.value - first.value)
        }
        _ => String::new(),
    };

    let best_sets = state.workout_repo.best_sets(user.id).await?;
    let progressions = fold_progressions(&best_sets)
        .into_iter()
        .map(|(name, first, latest)| {
            let gain = latest - first;
            let gain_pct = if first > 0.0 { gain / first * 100.0 } else { 0.0 };
            ProgressionView {
                name,
                first_display: format!("{:.1}", first),
                latest_display: format!("{:.1}", latest),
                gain_display: format!("{:+.1}", gain),
                gain_pct_display: format!("{:+.1}%", gain_pct),
                improved: gain > 0.0,
            }
        })
        .collect();

    let template = ProgressTemplate {
        weight_points,
        weight_delta,
        progressions,
    };
    render(template)
}

// Records tab

struct RecordView {
    name: String,
    weight_display: String,
    date_label: String,
}

struct AchievementView {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    rarity: &'static str,
    earned: bool,
}

struct SplitView {
    name: &'static str,
    sessions: i64,
    pct: i64,
}

#[derive(Template)]
#[template(path = "stats/records.html")]
struct RecordsTemplate {
    records: Vec<RecordView>,
    achievements: Vec<AchievementView>,
    splits: Vec<SplitView>,
    preferred_split: &'static str,
    split_consistency: i64,
}

/// How evenly the sessions spread over the split: variance against an
/// even share, scaled to 0..100.
fn consistency_score(percentages: &[f64]) -> i64 {
    if percentages.is_empty() {
        return 0;
    }
    let ideal = 100.0 / percentages.len() as f64;
    let variance = percentages
        .iter()
        .map(|p| (p - ideal).powi(2))
        .sum::<f64>()
        / percentages.len() as f64;
    let max_variance = (100.0 - ideal).powi(2);
    if max_variance <= 0.0 {
        return 100;
    }
    (100.0 - variance / max_variance * 100.0).max(0.0).round() as i64
}

fn achievements(user: &User, stats: &WorkoutStats, records: &[ExerciseRecord]) -> Vec<AchievementView> {
    let heaviest = records.iter().map(|r| r.weight).fold(0.0_f64, f64::max);
    vec![
        AchievementView {
            title: "Consistency King",
            description: "Worked out 30 days in a row",
            icon: "\u{1F451}",
            rarity: "legendary",
            earned: user.longest_streak >= 30,
        },
        AchievementView {
            title: "Strength Milestone",
            description: "Lifted 100kg in a single set",
            icon: "\u{1F3AF}",
            rarity: "epic",
            earned: heaviest >= 100.0,
        },
        AchievementView {
            title: "Volume Beast",
            description: "Completed 50,000kg total volume",
            icon: "\u{1F525}",
            rarity: "rare",
            earned: stats.total_volume >= 50_000.0,
        },
        AchievementView {
            title: "Habit Builder",
            description: "Completed 10 workouts",
            icon: "\u{1F305}",
            rarity: "common",
            earned: stats.total_workouts >= 10,
        },
    ]
}

fn split_views(splits: &[SplitShare]) -> Vec<SplitView> {
    let total: i64 = splits.iter().map(|s| s.sessions).sum();
    if total == 0 {
        return Vec::new();
    }
    splits
        .iter()
        .map(|s| SplitView {
            name: s.workout_type.display_name(),
            sessions: s.sessions,
            pct: (s.sessions * 100 + total / 2) / total,
        })
        .collect()
}

pub async fn records(State(state): State<StatsState>) -> Result<Response> {
    let user = current_user(&state.user_repo).await?;

    let stats = state.workout_repo.stats_for_user(user.id).await?;
    let max_records = state.workout_repo.max_weight_records(user.id).await?;
    let splits = state.workout_repo.split_distribution(user.id).await?;

    let records = max_records
        .iter()
        .map(|r| RecordView {
            name: r.name.clone(),
            weight_display: format!("{:.1}", r.weight),
            date_label: r.date.format("%b %d, %Y").to_string(),
        })
        .collect();
    let achievements = achievements(&user, &stats, &max_records);

    let split_views = split_views(&splits);
    let preferred_split = split_views
        .iter()
        .max_by_key(|s| s.sessions)
        .map(|s| s.name)
        .unwrap_or("None yet");
    let percentages: Vec<f64> = split_views.iter().map(|s| s.pct as f64).collect();
    let split_consistency = consistency_score(&percentages);

    let template = RecordsTemplate {
        records,
        achievements,
        splits: split_views,
        preferred_split,
        split_consistency,
    };
    render(template)
}

async fn current_user(user_repo: &UserRepository) -> Result<User> {
    user_repo
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

fn render<T: Template>(template: T) -> Result<Response> {
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

fn weekday_label(date: NaiveDate) -> &'static str {
    const LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    LABELS[date.weekday().num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutType;
    use chrono::Utc;

    #[test]
    fn test_consistency_score_even_split() {
        assert_eq!(consistency_score(&[25.0, 25.0, 25.0, 25.0]), 100);
    }

    #[test]
    fn test_consistency_score_single_split() {
        // Everything in one bucket is as uneven as it gets
        assert_eq!(consistency_score(&[100.0, 0.0, 0.0, 0.0]), 67);
        assert_eq!(consistency_score(&[]), 0);
    }

    #[test]
    fn test_consistency_score_in_range() {
        let cases: [&[f64]; 2] = [&[45.0, 25.0, 20.0, 10.0], &[60.0, 25.0, 10.0, 5.0]];
        for shares in cases {
            let score = consistency_score(shares);
            assert!((0..=100).contains(&score));
        }
    }

    #[test]
    fn test_fold_progressions_first_vs_latest() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let sets = vec![
            BestSet { name: "Bench Press".into(), date: day(1), weight: 100.0 },
            BestSet { name: "Squat".into(), date: day(2), weight: 140.0 },
            BestSet { name: "Bench Press".into(), date: day(10), weight: 110.0 },
            BestSet { name: "Bench Press".into(), date: day(20), weight: 120.0 },
        ];
        let folded = fold_progressions(&sets);
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0], ("Bench Press".to_string(), 100.0, 120.0));
        assert_eq!(folded[1], ("Squat".to_string(), 140.0, 140.0));
    }

    #[test]
    fn test_achievement_thresholds() {
        let user = User {
            id: 1,
            name: "Test".into(),
            email: None,
            level: 12,
            total_xp: 18500,
            current_streak: 8,
            longest_streak: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let stats = WorkoutStats {
            total_workouts: 10,
            total_minutes: 400,
            total_volume: 50_000.0,
        };
        let records = vec![ExerciseRecord {
            name: "Squat".into(),
            weight: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }];

        let earned: Vec<bool> = achievements(&user, &stats, &records)
            .iter()
            .map(|a| a.earned)
            .collect();
        assert_eq!(earned, vec![true, true, true, true]);

        let nothing = achievements(
            &User { longest_streak: 0, ..user },
            &WorkoutStats::default(),
            &[],
        );
        assert!(nothing.iter().all(|a| !a.earned));
    }

    #[test]
    fn test_split_views_percentages() {
        let splits = vec![
            SplitShare { workout_type: WorkoutType::Strength, sessions: 3 },
            SplitShare { workout_type: WorkoutType::Hiit, sessions: 1 },
        ];
        let views = split_views(&splits);
        assert_eq!(views[0].pct, 75);
        assert_eq!(views[1].pct, 25);
        assert!(split_views(&[]).is_empty());
    }
}
