use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const PREFS_COOKIE_NAME: &str = "prefs";

/// Profile-screen toggles, persisted client-side in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub notifications: bool,
    pub workout_reminders: bool,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            workout_reminders: true,
            dark_mode: false,
        }
    }
}

pub fn load_preferences(jar: &CookieJar) -> Preferences {
    jar.get(PREFS_COOKIE_NAME)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

pub fn preferences_cookie(prefs: &Preferences) -> Cookie<'static> {
    let value = serde_json::to_string(prefs).unwrap_or_default();
    Cookie::build((PREFS_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(365))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert!(prefs.notifications);
        assert!(prefs.workout_reminders);
        assert!(!prefs.dark_mode);
    }

    #[test]
    fn test_round_trip_through_cookie() {
        let prefs = Preferences {
            notifications: false,
            workout_reminders: true,
            dark_mode: true,
        };
        let cookie = preferences_cookie(&prefs);
        let jar = CookieJar::new().add(cookie);
        assert_eq!(load_preferences(&jar), prefs);
    }

    #[test]
    fn test_garbage_cookie_falls_back_to_defaults() {
        let jar = CookieJar::new().add(Cookie::new(PREFS_COOKIE_NAME, "not json"));
        assert_eq!(load_preferences(&jar), Preferences::default());
    }
}
