use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One (subject, session-type) counter pair.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub subject_id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "class")]
    pub session_type: String,
    #[schema(example = 12)]
    pub total_classes: i64,
    #[schema(example = 9)]
    pub attended_classes: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Class,
    Lab,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Class => "class",
            SessionType::Lab => "lab",
        }
    }
}

/// Update policy for a client-proposed counter pair. Non-numeric input never
/// gets here (serde rejects it); negatives and attended > total do.
pub fn validate_counts(total_classes: i64, attended_classes: i64) -> Result<(), ApiError> {
    if total_classes < 0 || attended_classes < 0 {
        return Err(ApiError::validation("Class counts must not be negative."));
    }
    if attended_classes > total_classes {
        return Err(ApiError::validation(
            "Attended classes cannot exceed total classes.",
        ));
    }
    Ok(())
}
