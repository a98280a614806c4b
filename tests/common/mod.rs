#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Next, from_fn};
use actix_web::web::Data;
use actix_web::{App, test};
use classtrack::{config::Config, db, routes};
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        token_ttl: 3600,
        rate_login_per_min: 60,
        rate_signup_per_min: 60,
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
    }
}

/// In-memory pool pinned to one connection so every request sees the same
/// database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::init_schema(&pool).await.expect("schema");
    pool
}

/// `test::init_service` has no HTTP dispatcher layer, so errors bubbling out
/// of middleware stay `Err` instead of becoming responses. Mirror what the
/// real server does: render them through `ResponseError`.
async fn render_errors(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    // Cloning the incoming HttpRequest before routing makes actix's router
    // panic, so the error path carries a dummy request instead; tests only
    // look at the response status and body.
    match next.call(req).await {
        Ok(res) => Ok(res),
        Err(err) => Ok(ServiceResponse::new(
            test::TestRequest::default().to_http_request(),
            err.error_response(),
        )),
    }
}

pub async fn spawn() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    SqlitePool,
) {
    let config = test_config();
    let pool = test_pool().await;
    let app = test::init_service(
        App::new()
            .wrap(from_fn(render_errors))
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, config.clone())),
    )
    .await;
    (app, pool)
}

/// The rate limiter keys on peer IP, so every test request carries one.
pub fn peer() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr(peer())
        .set_json(body)
        .to_request()
}

pub fn authed_post(uri: &str, token: &str, body: serde_json::Value) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request()
}

pub fn authed_get(uri: &str, token: &str) -> Request {
    test::TestRequest::get()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

pub fn authed_delete(uri: &str, token: &str) -> Request {
    test::TestRequest::delete()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

/// Registers a fresh user and returns their bearer token.
pub async fn signup_and_login<S, B>(app: &S, name: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(
        app,
        post_json(
            "/auth/signup",
            json!({ "name": name, "email": email, "password": "hunter2" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), 201, "signup should succeed");

    let resp = test::call_service(
        app,
        post_json(
            "/auth/login",
            json!({ "email": email, "password": "hunter2" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), 200, "login should succeed");

    let body: serde_json::Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("token in response").to_string()
}

/// Creates a subject for the given user and returns its id.
pub async fn create_subject<S, B>(app: &S, token: &str, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(
        app,
        authed_post("/api/subjects", token, json!({ "subject_name": name })),
    )
    .await;
    assert_eq!(resp.status(), 201, "subject creation should succeed");
    let body: serde_json::Value = test::read_body_json(resp).await;
    body["id"].as_i64().expect("subject id")
}
