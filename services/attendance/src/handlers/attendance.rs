use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use campus_domain::attendance::AttendanceStatus;
use campus_domain::id::{AttendanceRecordId, CourseId, LectureId, UserId};

use crate::domain::codec::DecodeError;
use crate::domain::types::{AttendanceRecord, StudentAttendance};
use crate::error::AttendanceServiceError;
use crate::handlers::{Authenticated, IdPath};
use crate::state::AppState;
use crate::usecase::attendance::{
    ToggleAttendanceUseCase, ViewCourseAttendanceUseCase, ViewLectureAttendanceUseCase,
};
use crate::usecase::check_in::CheckInUseCase;

#[derive(Serialize)]
pub struct AttendanceRecordResponse {
    pub id: AttendanceRecordId,
    pub lecture_id: LectureId,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub student_name: String,
    pub lecture_number: u8,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "campus_core::serde::to_rfc3339_ms_opt")]
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            lecture_id: record.lecture_id,
            course_id: record.course_id,
            student_id: record.student_id,
            student_name: record.student_name,
            lecture_number: record.lecture_number,
            status: record.status,
            checked_in_at: record.checked_in_at,
        }
    }
}

// ── POST /attendance/scan ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScanRequest {
    pub payload: String,
}

#[derive(Serialize)]
pub struct ScanResponse {
    pub status: AttendanceStatus,
}

pub async fn scan(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResponse>, AttendanceServiceError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "scan without a payload");
        DecodeError::Missing
    })?;
    let usecase = CheckInUseCase {
        lectures: state.lecture_repo(),
        attendance: state.attendance_repo(),
        codec: state.payload_codec(),
    };
    let status = usecase.execute(identity, &body.payload).await?;
    Ok(Json(ScanResponse { status }))
}

// ── PATCH /attendance/{recordId}/toggle ──────────────────────────────────────

pub async fn toggle_attendance(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(record_id), _): IdPath<AttendanceRecordId>,
) -> Result<Json<AttendanceRecordResponse>, AttendanceServiceError> {
    let usecase = ToggleAttendanceUseCase {
        courses: state.course_repo(),
        attendance: state.attendance_repo(),
    };
    let record = usecase.execute(identity, record_id).await?;
    Ok(Json(record.into()))
}

// ── GET /lectures/{id}/attendance ────────────────────────────────────────────

pub async fn get_lecture_attendance(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(lecture_id), _): IdPath<LectureId>,
) -> Result<Json<Vec<AttendanceRecordResponse>>, AttendanceServiceError> {
    let usecase = ViewLectureAttendanceUseCase {
        courses: state.course_repo(),
        lectures: state.lecture_repo(),
        attendance: state.attendance_repo(),
    };
    let records = usecase.execute(identity, lecture_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

// ── GET /courses/{id}/attendance ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct LectureAttendanceResponse {
    pub record_id: AttendanceRecordId,
    pub lecture_id: LectureId,
    pub lecture_number: u8,
    pub status: AttendanceStatus,
}

#[derive(Serialize)]
pub struct StudentAttendanceResponse {
    pub student_id: UserId,
    pub student_name: String,
    pub attendances: Vec<LectureAttendanceResponse>,
}

impl From<StudentAttendance> for StudentAttendanceResponse {
    fn from(row: StudentAttendance) -> Self {
        Self {
            student_id: row.student_id,
            student_name: row.student_name,
            attendances: row
                .attendances
                .into_iter()
                .map(|a| LectureAttendanceResponse {
                    record_id: a.record_id,
                    lecture_id: a.lecture_id,
                    lecture_number: a.lecture_number,
                    status: a.status,
                })
                .collect(),
        }
    }
}

pub async fn get_course_attendance(
    WithRejection(identity, _): Authenticated,
    State(state): State<AppState>,
    WithRejection(Path(course_id), _): IdPath<CourseId>,
) -> Result<Json<Vec<StudentAttendanceResponse>>, AttendanceServiceError> {
    let usecase = ViewCourseAttendanceUseCase {
        courses: state.course_repo(),
        attendance: state.attendance_repo(),
    };
    let rows = usecase.execute(identity, course_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
