mod common;

use crate::common::*;
use http::StatusCode;
use northstar::app::db;

#[tokio::test]
async fn login_sets_http_only_session_cookie() {
    let pool = test_pool().await;
    let org = create_org(&pool, "Acme", None).await;
    create_user(&pool, &org, "dana@acme.test").await;
    let app = test_router(pool);

    let request = http::Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "email": "  Dana@Acme.TEST " }).to_string(),
        ))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("northstar_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert_eq!(extract_session_token(&set_cookie).unwrap().len(), 64);
}

#[tokio::test]
async fn login_response_names_user_and_org() {
    let pool = test_pool().await;
    let org = create_org(&pool, "Acme", None).await;
    let user_id = create_user(&pool, &org, "dana@acme.test").await;
    let app = test_router(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": "dana@acme.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id);
    assert_eq!(body["organization_id"], org.as_str());
}

#[tokio::test]
async fn unknown_email_is_rejected() {
    let pool = test_pool().await;
    let app = test_router(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": "nobody@acme.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unknown email");
}

#[tokio::test]
async fn malformed_email_is_a_validation_error() {
    let pool = test_pool().await;
    let app = test_router(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_requires_a_session() {
    let pool = test_pool().await;
    let app = test_router(pool);

    let (status, body) = send(&app, "GET", "/api/organizations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, body) = send(
        &app,
        "GET",
        "/api/organizations",
        Some("northstar_session=invalid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn only_the_token_hash_is_stored() {
    let pool = test_pool().await;
    let org = create_org(&pool, "Acme", None).await;
    create_user(&pool, &org, "dana@acme.test").await;
    let app = test_router(pool.clone());

    let cookie = login_cookie(&app, "dana@acme.test").await;
    let token = cookie.strip_prefix("northstar_session=").unwrap();

    let stored: Vec<String> = sqlx::query_scalar("SELECT token_hash FROM sessions")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(stored, vec![db::sessions::hash_token(token)]);
    assert!(db::sessions::find_valid(&pool, token).await.unwrap().is_some());
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
    let pool = test_pool().await;
    let org = create_org(&pool, "Acme", None).await;
    create_user(&pool, &org, "dana@acme.test").await;
    let app = test_router(pool.clone());

    let cookie = login_cookie(&app, "dana@acme.test").await;
    sqlx::query("UPDATE sessions SET expires_at = 0")
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(&app, "GET", "/api/organizations", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(db::sessions::delete_expired(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let pool = test_pool().await;
    let org = create_org(&pool, "Acme", None).await;
    create_user(&pool, &org, "dana@acme.test").await;
    let app = test_router(pool);

    let cookie = login_cookie(&app, "dana@acme.test").await;
    let (status, _) = send(&app, "GET", "/api/organizations", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/organizations", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
