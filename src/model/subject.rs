use crate::model::attendance::Attendance;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Math")]
    pub subject_name: String,
    #[schema(example = 1)]
    pub user_id: i64,
}

/// A subject with its attendance children attached, as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectWithAttendance {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Math")]
    pub subject_name: String,
    #[schema(example = 1)]
    pub user_id: i64,
    pub attendance: Vec<Attendance>,
}

impl SubjectWithAttendance {
    pub fn new(subject: Subject, attendance: Vec<Attendance>) -> Self {
        SubjectWithAttendance {
            id: subject.id,
            subject_name: subject.subject_name,
            user_id: subject.user_id,
            attendance,
        }
    }
}
