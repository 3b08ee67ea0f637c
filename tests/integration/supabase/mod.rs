//! Gateway behavior with Supabase (local JWT check + identity confirmation)

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    fresh_user_id, supabase_token, supabase_token_signed, TestApp, SUPABASE_ANON_KEY,
    SUPABASE_USER_PATH, UPSTREAM_DELAY,
};

fn supabase_user(id: &str, role: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", id),
        "app_metadata": { "provider": "email", "role": role },
        "user_metadata": {}
    })
}

#[test_log::test(tokio::test)]
async fn test_confirmed_identity_reaches_handler() {
    let app = TestApp::supabase().await;
    let sub = fresh_user_id();
    let token = supabase_token(&sub, Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .and(header("apikey", SUPABASE_ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(supabase_user(&sub, Some("editor"))))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], sub.as_str());
    assert_eq!(body["role"], "EDITOR");
}

#[test_log::test(tokio::test)]
async fn test_expired_token_rejected_without_remote_call() {
    let app = TestApp::supabase().await;
    let token = supabase_token(&fresh_user_id(), Duration::hours(-1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(supabase_user("x", None)))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[test_log::test(tokio::test)]
async fn test_token_expired_seconds_ago_is_rejected_locally() {
    let app = TestApp::supabase().await;
    let token = supabase_token(&fresh_user_id(), Duration::seconds(-5));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(supabase_user("x", None)))
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_eq!(app.upstream_calls().await, 0);
}

#[test_log::test(tokio::test)]
async fn test_foreign_signature_rejected_without_remote_call() {
    let app = TestApp::supabase().await;
    let token = supabase_token_signed(&fresh_user_id(), Duration::hours(1), "some-other-secret");

    let (status, _) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.upstream_calls().await, 0);
}

#[test_log::test(tokio::test)]
async fn test_revoked_session_is_invalid() {
    let app = TestApp::supabase().await;
    let token = supabase_token(&fresh_user_id(), Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "msg": "invalid JWT"
        })))
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[test_log::test(tokio::test)]
async fn test_no_identity_in_response_is_invalid() {
    let app = TestApp::supabase().await;
    let token = supabase_token(&fresh_user_id(), Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[test_log::test(tokio::test)]
async fn test_supabase_outage_fails_closed() {
    let app = TestApp::supabase().await;
    let token = supabase_token(&fresh_user_id(), Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_VALIDATION_FAILED");
}

#[test_log::test(tokio::test)]
async fn test_slow_confirmation_times_out() {
    let app = TestApp::supabase().await;
    let sub = fresh_user_id();
    let token = supabase_token(&sub, Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(supabase_user(&sub, Some("admin")))
                .set_delay(UPSTREAM_DELAY),
        )
        .mount(&app.upstream)
        .await;

    let (status, body) = app.get("/api/v1/admin/ping", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_VALIDATION_FAILED");
}

#[test_log::test(tokio::test)]
async fn test_metadata_role_gates_admin_endpoint() {
    let app = TestApp::supabase().await;
    let admin = supabase_token("admin-id", Duration::hours(1));
    let member = supabase_token("member-id", Duration::hours(1));

    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .and(header("authorization", format!("Bearer {}", admin).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(supabase_user("admin-id", Some("admin"))))
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(SUPABASE_USER_PATH))
        .and(header("authorization", format!("Bearer {}", member).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(supabase_user("member-id", None)))
        .mount(&app.upstream)
        .await;

    let (admin_result, member_result) = tokio::join!(
        app.get("/api/v1/admin/ping", Some(&admin)),
        app.get("/api/v1/admin/ping", Some(&member)),
    );

    assert_eq!(admin_result.0, StatusCode::OK);
    assert_eq!(admin_result.1["userId"], "admin-id");
    assert_eq!(member_result.0, StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn test_unprotected_endpoint_skips_both_phases() {
    let app = TestApp::supabase().await;

    let (status, body) = app
        .get("/api/v1/health/test-logging", Some("not-a-jwt"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["requestId"].is_string());
    assert_eq!(app.upstream_calls().await, 0);
}
