use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::Attendance;
use crate::model::subject::{Subject, SubjectWithAttendance};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateSubject {
    #[schema(example = "Math")]
    pub subject_name: String,
}

/// Create a subject with its two zero-count attendance children.
#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubject,
    responses(
        (status = 201, description = "Subject created", body = SubjectWithAttendance),
        (status = 400, description = "Subject name is required"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateSubject>,
) -> Result<HttpResponse, ApiError> {
    let subject_name = body.subject_name.trim();
    if subject_name.is_empty() {
        return Err(ApiError::validation("Subject name is required."));
    }

    // Subject and both children land in one transaction; a subject without
    // its counter rows must never be visible.
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::storage("Failed to add subject.", e))?;

    let subject_id = sqlx::query(
        r#"INSERT INTO subjects (subject_name, user_id) VALUES (?, ?)"#,
    )
    .bind(subject_name)
    .bind(auth.user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| ApiError::storage("Failed to add subject.", e))?
    .last_insert_rowid();

    for session_type in ["class", "lab"] {
        sqlx::query(
            r#"
            INSERT INTO attendance (subject_id, type, total_classes, attended_classes)
            VALUES (?, ?, 0, 0)
            "#,
        )
        .bind(subject_id)
        .bind(session_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::storage("Failed to add subject.", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| ApiError::storage("Failed to add subject.", e))?;

    let attendance = fetch_children(pool.get_ref(), subject_id).await?;

    info!(user_id = auth.user_id, subject_id, "Subject created");

    Ok(HttpResponse::Created().json(SubjectWithAttendance::new(
        Subject {
            id: subject_id,
            subject_name: subject_name.to_string(),
            user_id: auth.user_id,
        },
        attendance,
    )))
}

/// List the caller's subjects, attendance children attached.
#[utoipa::path(
    get,
    path = "/api/subjects",
    responses(
        (status = 200, description = "Owned subjects", body = [SubjectWithAttendance]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn list_subjects(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    debug!(user_id = auth.user_id, "Listing subjects");

    let subjects = sqlx::query_as::<_, Subject>(
        r#"
        SELECT id, subject_name, user_id
        FROM subjects
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| ApiError::storage("Failed to fetch subjects.", e))?;

    let rows = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT a.id, a.subject_id, a.type, a.total_classes, a.attended_classes
        FROM attendance a
        JOIN subjects s ON s.id = a.subject_id
        WHERE s.user_id = ?
        ORDER BY a.subject_id, a.type
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| ApiError::storage("Failed to fetch subjects.", e))?;

    let mut children: HashMap<i64, Vec<Attendance>> = HashMap::new();
    for row in rows {
        children.entry(row.subject_id).or_default().push(row);
    }

    let result: Vec<SubjectWithAttendance> = subjects
        .into_iter()
        .map(|subject| {
            let attendance = children.remove(&subject.id).unwrap_or_default();
            SubjectWithAttendance::new(subject, attendance)
        })
        .collect();

    Ok(HttpResponse::Ok().json(result))
}

/// Delete a subject and its attendance children.
#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    params(("id", Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = Object, example = json!({
            "message": "Subject deleted successfully."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subject not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let subject_id = path.into_inner();

    // Children go first, both inside one transaction; no cascading
    // constraint is relied on.
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::storage("Failed to delete subject.", e))?;

    sqlx::query(r#"DELETE FROM attendance WHERE subject_id = ?"#)
        .bind(subject_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::storage("Failed to delete subject.", e))?;

    let deleted = sqlx::query(r#"DELETE FROM subjects WHERE id = ? AND user_id = ?"#)
        .bind(subject_id)
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::storage("Failed to delete subject.", e))?
        .rows_affected();

    if deleted == 0 {
        // Unknown id or another user's subject; either way nothing happened.
        tx.rollback()
            .await
            .map_err(|e| ApiError::storage("Failed to delete subject.", e))?;
        return Err(ApiError::not_found("Subject not found."));
    }

    tx.commit()
        .await
        .map_err(|e| ApiError::storage("Failed to delete subject.", e))?;

    info!(user_id = auth.user_id, subject_id, "Subject deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Subject deleted successfully."
    })))
}

pub(crate) async fn fetch_children(
    pool: &SqlitePool,
    subject_id: i64,
) -> Result<Vec<Attendance>, ApiError> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, subject_id, type, total_classes, attended_classes
        FROM attendance
        WHERE subject_id = ?
        ORDER BY type
        "#,
    )
    .bind(subject_id)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::storage("Failed to fetch subjects.", e))
}
