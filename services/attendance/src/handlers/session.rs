use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use campus_domain::id::LectureId;

use crate::error::AttendanceServiceError;
use crate::handlers::{Authenticated, IdPath};
use crate::state::AppState;
use crate::usecase::session::{CloseSessionUseCase, OpenSessionUseCase};

// ── POST /lectures/{id}/session/open ─────────────────────────────────────────

#[derive(Serialize)]
pub struct OpenSessionResponse {
    pub payload: String,
    pub records_created: usize,
}

pub async fn open_session(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(lecture_id), _): IdPath<LectureId>,
) -> Result<Json<OpenSessionResponse>, AttendanceServiceError> {
    let usecase = OpenSessionUseCase {
        courses: state.course_repo(),
        lectures: state.lecture_repo(),
        codec: state.payload_codec(),
    };
    let output = usecase.execute(identity, lecture_id).await?;
    Ok(Json(OpenSessionResponse {
        payload: output.payload,
        records_created: output.records_created,
    }))
}

// ── PATCH /lectures/{id}/session/close ───────────────────────────────────────

pub async fn close_session(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(lecture_id), _): IdPath<LectureId>,
) -> Result<StatusCode, AttendanceServiceError> {
    let usecase = CloseSessionUseCase {
        courses: state.course_repo(),
        lectures: state.lecture_repo(),
    };
    usecase.execute(identity, lecture_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
