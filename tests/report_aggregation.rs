mod common;

use actix_web::test;
use common::{authed_get, authed_post, create_subject, signup_and_login, spawn};
use serde_json::json;

async fn set_counters<S, B>(
    app: &S,
    token: &str,
    subject_id: i64,
    session_type: &str,
    total: i64,
    attended: i64,
) where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let resp = test::call_service(
        app,
        authed_post(
            "/api/attendance",
            token,
            json!({
                "subjectId": subject_id,
                "type": session_type,
                "total_classes": total,
                "attended_classes": attended,
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn fresh_user_reports_all_zeros() {
    let (app, _pool) = spawn().await;
    let token = signup_and_login(&app, "Jane", "jane@example.com").await;

    let resp = test::call_service(&app, authed_get("/api/report", &token)).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["attended"], 0);
    assert_eq!(body["percentage"], 0.0);
    assert_eq!(body["needed"], 0);
}

#[actix_web::test]
async fn report_sums_across_subjects_and_types() {
    let (app, _pool) = spawn().await;
    let token = signup_and_login(&app, "Jane", "jane@example.com").await;

    let math = create_subject(&app, &token, "Math").await;
    let physics = create_subject(&app, &token, "Physics").await;

    // 100 held, 70 attended across four counters
    set_counters(&app, &token, math, "class", 40, 30).await;
    set_counters(&app, &token, math, "lab", 20, 10).await;
    set_counters(&app, &token, physics, "class", 30, 25).await;
    set_counters(&app, &token, physics, "lab", 10, 5).await;

    let resp = test::call_service(&app, authed_get("/api/report", &token)).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 100);
    assert_eq!(body["attended"], 70);
    assert_eq!(body["percentage"].as_f64().unwrap(), 70.0);
    // ceil((7500 - 7000) / 25)
    assert_eq!(body["needed"], 20);
}

#[actix_web::test]
async fn full_attendance_needs_no_extra_classes() {
    let (app, _pool) = spawn().await;
    let token = signup_and_login(&app, "Jane", "jane@example.com").await;
    let subject_id = create_subject(&app, &token, "Math").await;

    set_counters(&app, &token, subject_id, "class", 40, 40).await;

    let resp = test::call_service(&app, authed_get("/api/report", &token)).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["percentage"].as_f64().unwrap(), 100.0);
    assert_eq!(body["needed"], 0);
}

#[actix_web::test]
async fn report_ignores_other_users_subjects() {
    let (app, _pool) = spawn().await;
    let token_a = signup_and_login(&app, "Alice", "alice@example.com").await;
    let token_b = signup_and_login(&app, "Bob", "bob@example.com").await;

    let alice_subject = create_subject(&app, &token_a, "Math").await;
    let bob_subject = create_subject(&app, &token_b, "Chemistry").await;
    set_counters(&app, &token_a, alice_subject, "class", 10, 10).await;
    set_counters(&app, &token_b, bob_subject, "class", 50, 1).await;

    let resp = test::call_service(&app, authed_get("/api/report", &token_a)).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 10);
    assert_eq!(body["attended"], 10);
    assert_eq!(body["needed"], 0);
}

#[actix_web::test]
async fn deleting_a_subject_drops_it_from_the_report() {
    let (app, _pool) = spawn().await;
    let token = signup_and_login(&app, "Jane", "jane@example.com").await;

    let math = create_subject(&app, &token, "Math").await;
    let physics = create_subject(&app, &token, "Physics").await;
    set_counters(&app, &token, math, "class", 10, 2).await;
    set_counters(&app, &token, physics, "class", 20, 20).await;

    let resp = test::call_service(
        &app,
        common::authed_delete(&format!("/api/subjects/{math}"), &token),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, authed_get("/api/report", &token)).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 20);
    assert_eq!(body["attended"], 20);
    assert_eq!(body["percentage"].as_f64().unwrap(), 100.0);
}
