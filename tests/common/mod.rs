use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::test;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use lms::config::Config;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "integration-test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 3600,
        tz_offset_minutes: 0,
        api_prefix: "/api".into(),
    }
}

// A single connection so every request sees the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    lms::db::apply_schema(&pool).await.unwrap();
    pool
}

pub async fn request<S>(
    app: &S,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    test::call_service(app, req.to_request()).await
}

pub async fn read_json(resp: ServiceResponse<BoxBody>) -> Value {
    test::read_body_json(resp).await
}

/// Registers an account and returns its bearer token.
pub async fn register_and_login<S>(
    app: &S,
    name: &str,
    email: &str,
    role: Option<&str>,
    gender: Option<&str>,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let resp = request(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
            "department": "Engineering",
            "gender": gender,
        })),
    )
    .await;
    assert!(resp.status().is_success(), "registration failed: {}", resp.status());

    let resp = request(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());
    let body = read_json(resp).await;
    body["access_token"].as_str().unwrap().to_string()
}
