mod common;

use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_profile_renders_user_card() {
    let pool = common::setup_test_db();
    common::seed_app(&pool).await;
    let app = common::create_test_app(pool);

    let response = app.oneshot(common::get_request("/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_string(response).await;
    assert!(body.contains("Jobayer Mahbub"));
    assert!(body.contains("jobayer@example.com"));
    assert!(body.contains("Level 1"));
    assert!(body.contains("Beginner"));
    // Defaults: notifications and reminders on, dark mode off
    assert!(body.contains(r#"name="notifications" checked"#));
    assert!(body.contains(r#"name="workout_reminders" checked"#));
    assert!(!body.contains(r#"name="dark_mode" checked"#));
}

#[tokio::test]
async fn test_update_preferences_sets_cookie() {
    let pool = common::setup_test_db();
    common::seed_app(&pool).await;
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(common::form_request(
            "/profile/preferences",
            "dark_mode=on",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/profile");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("preferences cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("prefs="));

    // Replaying the cookie shows dark mode on, notifications off
    let cookie_pair = set_cookie.split(';').next().unwrap();
    let request = http::Request::builder()
        .uri("/profile")
        .header(http::header::COOKIE, cookie_pair)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains(r#"name="dark_mode" checked"#));
    assert!(!body.contains(r#"name="notifications" checked"#));
}

#[tokio::test]
async fn test_demo_data_patches_profile() {
    let pool = common::setup_test_db();
    common::seed_app(&pool).await;
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(common::form_request("/profile/demo-data", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/profile");

    let response = app.oneshot(common::get_request("/profile")).await.unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains("Level 12"));
    assert!(body.contains("Advanced"));
    assert!(body.contains("18500"));
}

#[tokio::test]
async fn test_demo_data_without_user_is_not_found() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::form_request("/profile/demo-data", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_healthz() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app.oneshot(common::get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_string(response).await;
    assert!(body.contains(r#""status":"ok""#));
    assert!(body.contains("git_version"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::get_request("/no-such-page"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
