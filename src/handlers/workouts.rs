use std::sync::{Arc, Mutex};

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{MetricKind, WorkoutTemplate, TEMPLATES};
use crate::player::{format_mmss, LiveSession, SessionSummary};
use crate::repositories::{MetricRepository, UserRepository};

const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// Shared slot for the single live session. The player is a one-screen,
/// one-session feature; handlers tick it with the wall clock on every
/// request.
pub type LiveSlot = Arc<Mutex<Option<LiveSession>>>;

#[derive(Clone)]
pub struct WorkoutsState {
    pub user_repo: UserRepository,
    pub metric_repo: MetricRepository,
    pub live: LiveSlot,
}

impl WorkoutsState {
    fn lock_live(&self) -> Result<std::sync::MutexGuard<'_, Option<LiveSession>>> {
        self.live
            .lock()
            .map_err(|_| AppError::Internal("Live session lock poisoned".to_string()))
    }
}

#[derive(Template)]
#[template(path = "workouts/library.html")]
struct LibraryTemplate {
    templates: &'static [WorkoutTemplate],
    has_active: bool,
}

#[derive(Template)]
#[template(path = "workouts/live.html")]
struct LiveTemplate {
    workout_name: &'static str,
    elapsed: String,
    exercise_elapsed: String,
    calories: i64,
    exercise_number: usize,
    exercise_count: usize,
    progress_pct: i64,
    exercise_name: &'static str,
    current_set: u32,
    total_sets: u32,
    reps: u32,
    is_resting: bool,
    rest_remaining: String,
    is_paused: bool,
}

#[derive(Template)]
#[template(path = "workouts/summary.html")]
struct SummaryTemplate {
    workout_name: &'static str,
    elapsed: String,
    calories: i64,
    sets_completed: u32,
    total_sets: u32,
}

pub async fn library(State(state): State<WorkoutsState>) -> Result<Response> {
    let has_active = state.lock_live()?.is_some();
    let template = LibraryTemplate {
        templates: TEMPLATES,
        has_active,
    };
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn start(
    State(state): State<WorkoutsState>,
    Path(template_id): Path<u32>,
) -> Result<Response> {
    let template = WorkoutTemplate::find(template_id)
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    // Calorie math needs the body weight; fall back when never logged.
    let weight_kg = match state.user_repo.current().await? {
        Some(user) => state
            .metric_repo
            .latest(user.id, MetricKind::Weight)
            .await?
            .map(|m| m.value)
            .unwrap_or(DEFAULT_WEIGHT_KG),
        None => DEFAULT_WEIGHT_KG,
    };

    let mut live = state.lock_live()?;
    if live.is_some() {
        return Ok(Redirect::to("/workouts/live").into_response());
    }
    *live = Some(LiveSession::start(template, weight_kg, Utc::now()));
    tracing::info!(workout = template.name, "Workout started");

    Ok(Redirect::to("/workouts/live").into_response())
}

pub async fn live(State(state): State<WorkoutsState>) -> Result<Response> {
    let now = Utc::now();
    let mut slot = state.lock_live()?;
    let Some(session) = slot.as_mut() else {
        return Ok(Redirect::to("/workouts").into_response());
    };
    session.tick(now);

    let exercise = session.current_exercise();
    let template = LiveTemplate {
        workout_name: session.template().name,
        elapsed: format_mmss(session.elapsed_secs(now)),
        exercise_elapsed: format_mmss(session.exercise_elapsed_secs(now)),
        calories: session.calories_burned(),
        exercise_number: session.exercise_number(),
        exercise_count: session.template().exercise_count(),
        progress_pct: session.progress_pct().round() as i64,
        exercise_name: exercise.name,
        current_set: session.current_set(),
        total_sets: exercise.sets,
        reps: exercise.reps,
        is_resting: session.is_resting(),
        rest_remaining: format_mmss(session.rest_remaining_secs()),
        is_paused: session.is_paused(),
    };
    drop(slot);

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

fn render_summary(summary: SessionSummary) -> Result<Response> {
    tracing::info!(
        workout = summary.template_name,
        calories = summary.calories,
        "Workout complete"
    );
    let template = SummaryTemplate {
        workout_name: summary.template_name,
        elapsed: summary.elapsed_display(),
        calories: summary.calories,
        sets_completed: summary.sets_completed,
        total_sets: summary.total_sets,
    };
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn complete_set(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut slot = state.lock_live()?;
    let Some(session) = slot.as_mut() else {
        return Ok(Redirect::to("/workouts").into_response());
    };
    if let Some(summary) = session.complete_set(Utc::now()) {
        *slot = None;
        drop(slot);
        return render_summary(summary);
    }
    Ok(Redirect::to("/workouts/live").into_response())
}

pub async fn skip_exercise(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut slot = state.lock_live()?;
    let Some(session) = slot.as_mut() else {
        return Ok(Redirect::to("/workouts").into_response());
    };
    if let Some(summary) = session.skip_exercise(Utc::now()) {
        *slot = None;
        drop(slot);
        return render_summary(summary);
    }
    Ok(Redirect::to("/workouts/live").into_response())
}

pub async fn pause(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut slot = state.lock_live()?;
    if let Some(session) = slot.as_mut() {
        session.pause(Utc::now());
    }
    Ok(Redirect::to("/workouts/live").into_response())
}

pub async fn resume(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut slot = state.lock_live()?;
    if let Some(session) = slot.as_mut() {
        session.resume(Utc::now());
    }
    Ok(Redirect::to("/workouts/live").into_response())
}

/// End the workout early. The session is discarded either way; only the
/// summary leaves the player.
pub async fn end(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut slot = state.lock_live()?;
    let Some(session) = slot.as_mut() else {
        return Ok(Redirect::to("/workouts").into_response());
    };
    let summary = session.finish(Utc::now());
    *slot = None;
    drop(slot);
    render_summary(summary)
}
