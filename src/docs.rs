use crate::api::attendance::UpsertAttendance;
use crate::api::subject::CreateSubject;
use crate::model::attendance::{Attendance, SessionType};
use crate::model::subject::{Subject, SubjectWithAttendance};
use crate::models::{LoginReq, LoginResponse, SignupReq};
use crate::report::AttendanceReport;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classtrack API",
        version = "1.0.0",
        description = r#"
## Student Attendance Tracker

REST API for tracking per-subject class and lab attendance.

### Key Features
- **Accounts**: signup and JWT login
- **Subjects**: create, list, and delete subjects with per-type counters
- **Attendance**: overwrite class/lab counters per subject
- **Report**: aggregate percentage and classes needed to reach 75%

### Security
All routes except signup and login require **JWT Bearer authentication**.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::login,

        crate::api::subject::create_subject,
        crate::api::subject::list_subjects,
        crate::api::subject::delete_subject,

        crate::api::attendance::upsert_attendance,

        crate::api::report::report,
    ),
    components(
        schemas(
            SignupReq,
            LoginReq,
            LoginResponse,
            CreateSubject,
            Subject,
            SubjectWithAttendance,
            Attendance,
            SessionType,
            UpsertAttendance,
            AttendanceReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup and login"),
        (name = "Subjects", description = "Subject management"),
        (name = "Attendance", description = "Attendance counter updates"),
        (name = "Report", description = "Aggregate attendance report"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
