use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use campus_auth_types::identity::IdentityRejection;

use crate::domain::codec::DecodeError;

/// Attendance service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("lecture not found")]
    LectureNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("attendance record not found")]
    RecordNotFound,
    #[error("invalid attendance payload")]
    InvalidPayload(#[from] DecodeError),
    #[error("lecture number must be between 1 and 12")]
    InvalidLectureNumber,
    #[error("attendance session is closed")]
    SessionClosed,
    #[error("attendance already recorded")]
    AlreadyPresent,
    #[error("lecture already exists")]
    LectureAlreadyExists,
    #[error("duplicate check-in token")]
    DuplicateToken,
    #[error("invalid request body")]
    InvalidBody(#[from] JsonRejection),
    #[error("invalid path identifier")]
    InvalidPath(#[from] PathRejection),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::LectureNotFound => "LECTURE_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::InvalidLectureNumber => "INVALID_LECTURE_NUMBER",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::AlreadyPresent => "ALREADY_PRESENT",
            Self::LectureAlreadyExists => "LECTURE_ALREADY_EXISTS",
            Self::DuplicateToken => "DUPLICATE_TOKEN",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<IdentityRejection> for AttendanceServiceError {
    fn from(_: IdentityRejection) -> Self {
        Self::Unauthenticated
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::LectureNotFound | Self::CourseNotFound | Self::RecordNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidPayload(_)
            | Self::InvalidLectureNumber
            | Self::InvalidBody(_)
            | Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::SessionClosed | Self::AlreadyPresent | Self::LectureAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::DuplicateToken | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            Self::DuplicateToken => {
                tracing::error!(kind = "DUPLICATE_TOKEN", "check-in token collision");
            }
            Self::InvalidBody(e) => tracing::debug!(error = %e, "rejected request body"),
            Self::InvalidPath(e) => tracing::debug!(error = %e, "rejected path parameter"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
