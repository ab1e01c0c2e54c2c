use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::prefs::{load_preferences, preferences_cookie, Preferences};
use crate::repositories::UserRepository;
use crate::seed;
use crate::version::GIT_VERSION;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct ProfileState {
    pub user_repo: UserRepository,
    pub pool: crate::db::DbPool,
}

#[derive(Template)]
#[template(path = "profile/index.html")]
struct ProfileTemplate {
    user: User,
    email_display: String,
    joined: String,
    prefs: Preferences,
    app_version: &'static str,
    git_version: &'static str,
}

pub async fn index(State(state): State<ProfileState>, jar: CookieJar) -> Result<Response> {
    let user = state
        .user_repo
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let template = ProfileTemplate {
        email_display: user.email.clone().unwrap_or_default(),
        joined: user.created_at.format("%b %Y").to_string(),
        prefs: load_preferences(&jar),
        app_version: APP_VERSION,
        git_version: GIT_VERSION,
        user,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

/// Checkbox forms only submit the boxes that are checked.
#[derive(Deserialize)]
pub struct PreferencesForm {
    pub notifications: Option<String>,
    pub workout_reminders: Option<String>,
    pub dark_mode: Option<String>,
}

pub async fn update_preferences(
    jar: CookieJar,
    Form(form): Form<PreferencesForm>,
) -> Result<Response> {
    let prefs = Preferences {
        notifications: form.notifications.is_some(),
        workout_reminders: form.workout_reminders.is_some(),
        dark_mode: form.dark_mode.is_some(),
    };
    let jar = jar.add(preferences_cookie(&prefs));
    Ok((jar, Redirect::to("/profile")).into_response())
}

pub async fn apply_demo_data(State(state): State<ProfileState>) -> Result<Response> {
    seed::apply_demo_data(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Redirect::to("/profile").into_response())
}
