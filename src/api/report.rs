use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::report::AttendanceReport;
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;
use tracing::debug;

/// Aggregate attendance report across all of the caller's subjects.
#[utoipa::path(
    get,
    path = "/api/report",
    responses(
        (status = 200, description = "Aggregate report", body = AttendanceReport),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn report(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    debug!(user_id = auth.user_id, "Generating report");

    let (total, attended) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE(SUM(a.total_classes), 0),
            COALESCE(SUM(a.attended_classes), 0)
        FROM attendance a
        JOIN subjects s ON s.id = a.subject_id
        WHERE s.user_id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::storage("Failed to generate report.", e))?;

    Ok(HttpResponse::Ok().json(AttendanceReport::from_totals(total, attended)))
}
