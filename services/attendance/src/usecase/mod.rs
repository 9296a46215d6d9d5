use campus_auth_types::identity::Identity;
use campus_domain::role::Role;

use crate::domain::types::Course;
use crate::error::AttendanceServiceError;

pub mod attendance;
pub mod check_in;
pub mod lecture;
pub mod session;

/// Actor must hold one of `allowed`.
pub(crate) fn require_role(
    identity: &Identity,
    allowed: &[Role],
) -> Result<(), AttendanceServiceError> {
    if identity.authorize(allowed) {
        Ok(())
    } else {
        Err(AttendanceServiceError::Forbidden)
    }
}

/// Actor is the doctor who owns `course`.
pub(crate) fn require_course_doctor(
    identity: &Identity,
    course: &Course,
) -> Result<(), AttendanceServiceError> {
    if identity.role == Role::Doctor && identity.user_id == course.doctor_id {
        Ok(())
    } else {
        Err(AttendanceServiceError::Forbidden)
    }
}

/// Actor may read attendance of `course`: its doctor or any admin.
pub(crate) fn require_course_viewer(
    identity: &Identity,
    course: &Course,
) -> Result<(), AttendanceServiceError> {
    match identity.role {
        Role::Admin => Ok(()),
        _ => require_course_doctor(identity, course),
    }
}
