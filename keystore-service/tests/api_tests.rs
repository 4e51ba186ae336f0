mod common;

use auth::Claims;
use chrono::Duration;
use chrono::Utc;
use common::token_pair;
use common::TestApp;
use common::JWT_ISSUER;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "pw1").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 200);
    assert!(body["data"]["user_id"].as_i64().unwrap() > 0);
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());
    assert!(body["data"]["token_expires_at"].is_string());
    assert!(body["data"]["refresh_token_expires_at"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    app.register("alice", "pw1").await;
    let response = app.register("alice", "another").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_usernames_are_case_sensitive() {
    let app = TestApp::spawn().await;

    assert_eq!(app.register("alice", "pw1").await.status(), StatusCode::OK);
    assert_eq!(app.register("Alice", "pw1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = TestApp::spawn().await;

    let response = app.register("", "pw1").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.register(&"a".repeat(256), "pw1").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.register("alice", "").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 422);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    app.register("alice", "pw1").await;
    let response = app.login("alice", "pw1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let (token, _) = token_pair(response).await;

    let response = app
        .post_authenticated("/api/account/secret", &token)
        .json(&json!({ "value": "s3cret" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Login overwrites the refresh record rather than adding one
    assert_eq!(app.store.refresh_record_count().await, 1);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::spawn().await;

    let response = app.login("nobody", "pw1").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    app.register("alice", "pw1").await;
    let response = app.login("alice", "pw2").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 401);
}

#[tokio::test]
async fn test_register_authenticate_refresh_scenario() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "pw1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let (p1_token, p1_refresh) = token_pair(response).await;
    let alice_id = app.jwt_handler.verify(&p1_token).unwrap().user_id;

    let response = app
        .post_authenticated("/api/account/secret", &p1_token)
        .json(&json!({ "value": "4111 1111 1111 1111" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user_id"], alice_id);
    assert_eq!(body["opened"], "4111 1111 1111 1111");
    // IV plus two blocks for a 19-byte value
    assert_eq!(body["blob_len"], 48);

    let response = app.refresh(&p1_token, &p1_refresh).await;
    assert_eq!(response.status(), StatusCode::OK);
    let (p2_token, p2_refresh) = token_pair(response).await;
    assert_ne!(p2_refresh, p1_refresh);
    assert_eq!(app.jwt_handler.verify(&p2_token).unwrap().user_id, alice_id);

    let response = app.refresh(&p1_token, &p1_refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Refresh token does not match"));

    // The rotated secret keeps working
    let response = app.refresh(&p2_token, &p2_refresh).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_with_expired_access_token() {
    let app = TestApp::spawn().await;

    let (token, refresh_token) = token_pair(app.register("alice", "pw1").await).await;
    let user_id = app.jwt_handler.verify(&token).unwrap().user_id;

    let expired = app
        .jwt_handler
        .encode(&Claims::for_user(
            user_id,
            JWT_ISSUER,
            Duration::minutes(15),
            Utc::now() - Duration::hours(1),
        ))
        .unwrap();

    let response = app
        .post_authenticated("/api/account/secret", &expired)
        .json(&json!({ "value": "x" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.refresh(&expired, &refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_revoked_token() {
    let app = TestApp::spawn().await;

    let (token, refresh_token) = token_pair(app.register("alice", "pw1").await).await;
    let user_id = app.jwt_handler.verify(&token).unwrap().user_id;
    app.store.revoke(user_id).await;

    let response = app.refresh(&token, &refresh_token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refresh_expired_refresh_token() {
    let app = TestApp::spawn().await;

    let (token, refresh_token) = token_pair(app.register("alice", "pw1").await).await;
    let user_id = app.jwt_handler.verify(&token).unwrap().user_id;
    app.store
        .expire_refresh_token(user_id, Utc::now() - Duration::seconds(1))
        .await;

    let response = app.refresh(&token, &refresh_token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("expired"));
}

#[tokio::test]
async fn test_refresh_without_record() {
    let app = TestApp::spawn().await;

    // Valid signature for a user the store has never seen
    let token = app.jwt_handler.issue(999).unwrap().token;

    let response = app.refresh(&token, "whatever").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_with_invalid_access_token() {
    let app = TestApp::spawn().await;

    let (_, refresh_token) = token_pair(app.register("alice", "pw1").await).await;

    let response = app.refresh("not-a-token", &refresh_token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/account/secret")
        .json(&json!({ "value": "x" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_protected_route_rejects_bearer_prefix() {
    let app = TestApp::spawn().await;

    let (token, _) = token_pair(app.register("alice", "pw1").await).await;

    let response = app
        .post_authenticated("/api/account/secret", &format!("Bearer {}", token))
        .json(&json!({ "value": "x" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_zero_user_token() {
    let app = TestApp::spawn().await;

    let token = app.jwt_handler.issue(0).unwrap().token;

    let response = app
        .post_authenticated("/api/account/secret", &token)
        .json(&json!({ "value": "x" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
