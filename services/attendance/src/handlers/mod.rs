use axum::{Json, extract::Path};
use axum_extra::extract::WithRejection;

use campus_auth_types::identity::Identity;

use crate::error::AttendanceServiceError;

pub mod attendance;
pub mod lecture;
pub mod session;

/// Bearer-authenticated actor; rejections render as the service error shape.
pub type Authenticated = WithRejection<Identity, AttendanceServiceError>;

/// Path parameters; a malformed id is `INVALID_PATH`.
pub type IdPath<T> = WithRejection<Path<T>, AttendanceServiceError>;

/// JSON request body; a malformed body is `INVALID_BODY`.
pub type JsonBody<T> = WithRejection<Json<T>, AttendanceServiceError>;
