#![allow(dead_code)]

use axum::body::Body;
use http_body_util::BodyExt;
use northstar::app::{
    config::Config,
    db::{self, goals::NewGoal, organizations::NewOrganization, NewUser},
    domain::{Email, GoalStatus, GoalVisibility, OrganizationId, UserId},
    AppState,
};
use northstar::create_router;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState::new(pool, Config::for_tests())
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    create_router(test_state(pool))
}

pub async fn create_org(
    pool: &SqlitePool,
    name: &str,
    parent: Option<&OrganizationId>,
) -> OrganizationId {
    let id = OrganizationId::new();
    db::organizations::insert(
        pool,
        &NewOrganization {
            id: id.clone(),
            parent_id: parent.cloned(),
            name: name.to_string(),
            description: Some(format!("{name} team")),
            ai_guidelines: None,
        },
    )
    .await
    .unwrap();
    id
}

/// Create a user in `org`. Returns the user id.
pub async fn create_user(pool: &SqlitePool, org: &OrganizationId, email: &str) -> String {
    insert_user(pool, org, email, false).await
}

/// Create an administrator in `org`. Returns the user id.
pub async fn create_admin(pool: &SqlitePool, org: &OrganizationId, email: &str) -> String {
    insert_user(pool, org, email, true).await
}

async fn insert_user(pool: &SqlitePool, org: &OrganizationId, email: &str, is_admin: bool) -> String {
    let id = UserId::new();
    let name = email.split('@').next().unwrap().to_string();
    db::users::insert(
        pool,
        &NewUser {
            id: id.clone(),
            organization_id: org.clone(),
            name,
            email: Email::new(email.to_string()).unwrap(),
            job_function: None,
            is_leader: false,
            is_admin,
        },
    )
    .await
    .unwrap();
    id.as_str()
}

/// Create a goal owned by `org`. Returns the goal id.
pub async fn create_goal(
    pool: &SqlitePool,
    org: &OrganizationId,
    title: &str,
    visibility: GoalVisibility,
) -> String {
    let id = ulid::Ulid::new().to_string();
    db::goals::insert(
        pool,
        &NewGoal {
            id: id.clone(),
            organization_id: org.clone(),
            owner_id: None,
            title: title.to_string(),
            description: Some(format!("{title} description")),
            key_results: vec!["First milestone".to_string()],
            status: GoalStatus::InProgress,
            progress: 10,
            visibility,
        },
    )
    .await
    .unwrap();
    id
}

pub fn extract_session_token(set_cookie_header: &str) -> Option<&str> {
    set_cookie_header
        .split(';')
        .next()?
        .strip_prefix("northstar_session=")
}

/// Log in by email through the API. Returns a cookie header value.
pub async fn login_cookie(app: &axum::Router, email: &str) -> String {
    let request = http::Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "email": email }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK, "login failed for {email}");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    let token = extract_session_token(set_cookie).unwrap();
    format!("northstar_session={}", token)
}

/// Send a request and decode the JSON body (Null when empty or not JSON).
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> (http::StatusCode, serde_json::Value) {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Acme → {Engineering → {Platform, QA}, Product → UX}, plus an unrelated root Globex.
/// One member per organization, email `<name>@acme.test`.
pub struct Acme {
    pub pool: SqlitePool,
    pub acme: OrganizationId,
    pub eng: OrganizationId,
    pub product: OrganizationId,
    pub platform: OrganizationId,
    pub qa: OrganizationId,
    pub ux: OrganizationId,
    pub globex: OrganizationId,
}

impl Acme {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        let acme = create_org(&pool, "Acme", None).await;
        let eng = create_org(&pool, "Engineering", Some(&acme)).await;
        let product = create_org(&pool, "Product", Some(&acme)).await;
        let platform = create_org(&pool, "Platform", Some(&eng)).await;
        let qa = create_org(&pool, "QA", Some(&eng)).await;
        let ux = create_org(&pool, "UX", Some(&product)).await;
        let globex = create_org(&pool, "Globex", None).await;

        for (org, email) in [
            (&acme, "acme@acme.test"),
            (&eng, "eng@acme.test"),
            (&product, "product@acme.test"),
            (&platform, "platform@acme.test"),
            (&qa, "qa@acme.test"),
            (&ux, "ux@acme.test"),
            (&globex, "globex@acme.test"),
        ] {
            create_user(&pool, org, email).await;
        }

        Self {
            pool,
            acme,
            eng,
            product,
            platform,
            qa,
            ux,
            globex,
        }
    }

    pub fn router(&self) -> axum::Router {
        test_router(self.pool.clone())
    }

    pub fn state(&self) -> AppState {
        test_state(self.pool.clone())
    }

    /// Id of the fixture member with this email.
    pub async fn user_id(&self, email: &str) -> String {
        db::find_by_email(&self.pool, &Email::new(email.to_string()).unwrap())
            .await
            .unwrap()
            .unwrap()
            .id
    }
}
