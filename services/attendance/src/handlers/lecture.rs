use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use campus_domain::id::{CourseId, LectureId};
use campus_domain::session::SessionState;

use crate::domain::types::Lecture;
use crate::error::AttendanceServiceError;
use crate::handlers::{Authenticated, IdPath, JsonBody};
use crate::state::AppState;
use crate::usecase::lecture::{
    CreateCourseLecturesUseCase, CreateLectureInput, CreateLectureUseCase,
};

#[derive(Serialize)]
pub struct LectureResponse {
    pub id: LectureId,
    pub course_id: CourseId,
    pub lecture_number: u8,
    pub title: String,
    pub session_state: SessionState,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        Self {
            id: lecture.id,
            course_id: lecture.course_id,
            lecture_number: lecture.lecture_number,
            title: lecture.title,
            session_state: lecture.session_state,
            created_at: lecture.created_at,
        }
    }
}

// ── POST /lectures ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateLectureRequest {
    pub course_id: CourseId,
    pub lecture_number: i64,
    pub title: Option<String>,
}

pub async fn create_lecture(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<CreateLectureRequest>,
) -> Result<(StatusCode, Json<LectureResponse>), AttendanceServiceError> {
    let usecase = CreateLectureUseCase {
        courses: state.course_repo(),
        lectures: state.lecture_repo(),
    };
    let lecture = usecase
        .execute(
            identity,
            CreateLectureInput {
                course_id: body.course_id,
                lecture_number: body.lecture_number,
                title: body.title,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(lecture.into())))
}

// ── POST /courses/{id}/lectures ──────────────────────────────────────────────

pub async fn create_course_lectures(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(course_id), _): IdPath<CourseId>,
) -> Result<(StatusCode, Json<Vec<LectureResponse>>), AttendanceServiceError> {
    let usecase = CreateCourseLecturesUseCase {
        courses: state.course_repo(),
        lectures: state.lecture_repo(),
    };
    let lectures = usecase.execute(identity, course_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(lectures.into_iter().map(Into::into).collect()),
    ))
}
