use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, SessionType, validate_counts};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpsertAttendance {
    #[schema(example = 1)]
    #[serde(rename = "subjectId")]
    pub subject_id: i64,
    #[serde(rename = "type")]
    #[schema(example = "class")]
    pub session_type: SessionType,
    #[schema(example = 12)]
    pub total_classes: i64,
    #[schema(example = 9)]
    pub attended_classes: i64,
}

/// Overwrite the counters of one (subject, session-type) attendance record,
/// creating it if absent.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = UpsertAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 400, description = "Invalid counters"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subject not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn upsert_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Json<UpsertAttendance>,
) -> Result<HttpResponse, ApiError> {
    validate_counts(body.total_classes, body.attended_classes)?;

    // The subject must belong to the caller; a client-supplied subjectId is
    // never trusted on its own.
    let owned = sqlx::query_scalar::<_, i64>(
        r#"SELECT id FROM subjects WHERE id = ? AND user_id = ?"#,
    )
    .bind(body.subject_id)
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| ApiError::storage("Failed to update attendance.", e))?;

    if owned.is_none() {
        return Err(ApiError::not_found("Subject not found."));
    }

    // Database-native upsert on the (subject_id, type) unique key; two
    // concurrent writers cannot duplicate the row or tear the counters.
    let updated = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO attendance (subject_id, type, total_classes, attended_classes)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (subject_id, type) DO UPDATE SET
            total_classes = excluded.total_classes,
            attended_classes = excluded.attended_classes
        RETURNING id, subject_id, type, total_classes, attended_classes
        "#,
    )
    .bind(body.subject_id)
    .bind(body.session_type.as_str())
    .bind(body.total_classes)
    .bind(body.attended_classes)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::storage("Failed to update attendance.", e))?;

    info!(
        user_id = auth.user_id,
        subject_id = body.subject_id,
        session_type = body.session_type.as_str(),
        total = body.total_classes,
        attended = body.attended_classes,
        "Attendance updated"
    );

    Ok(HttpResponse::Ok().json(updated))
}
