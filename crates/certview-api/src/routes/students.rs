//! # Student Profile Routes

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use certview_core::StudentProfile;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/students/{student_id}", get(get_student))
}

/// GET /v1/students/{student_id} — academic profile of one student.
#[utoipa::path(
    get,
    path = "/v1/students/{student_id}",
    params(("student_id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Profile found", body = StudentProfile),
        (status = 404, description = "No profile for this student", body = crate::error::ErrorBody),
        (status = 503, description = "Certificate store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "students"
)]
pub(crate) async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentProfile>, AppError> {
    state
        .service
        .fetch_student_record(&student_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no profile for student {student_id}")))
}
