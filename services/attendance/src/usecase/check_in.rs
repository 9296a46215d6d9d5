use chrono::Utc;
use tracing::info;

use campus_auth_types::identity::Identity;
use campus_domain::attendance::{AttendanceStatus, CheckInToken};
use campus_domain::role::Role;

use crate::domain::codec::PayloadCodec;
use crate::domain::repository::{AttendanceRepository, LectureRepository};
use crate::error::AttendanceServiceError;
use crate::usecase::require_role;

// ── CheckIn ──────────────────────────────────────────────────────────────────

pub struct CheckInUseCase<L: LectureRepository, A: AttendanceRepository, P: PayloadCodec> {
    pub lectures: L,
    pub attendance: A,
    pub codec: P,
}

impl<L: LectureRepository, A: AttendanceRepository, P: PayloadCodec> CheckInUseCase<L, A, P> {
    /// Mark the scanning student present for the lecture named in `raw_payload`.
    ///
    /// The record is addressed only through the token derived from the decoded
    /// pair and the authenticated student, so a student can never mark anyone
    /// else.
    pub async fn execute(
        &self,
        identity: Identity,
        raw_payload: &str,
    ) -> Result<AttendanceStatus, AttendanceServiceError> {
        require_role(&identity, &[Role::Student])?;
        let payload = self.codec.decode(raw_payload)?;

        let lecture = self
            .lectures
            .find_by_id(payload.lecture_id)
            .await?
            .ok_or(AttendanceServiceError::LectureNotFound)?;
        if !lecture.session_state.is_open() {
            return Err(AttendanceServiceError::SessionClosed);
        }

        let token = CheckInToken::derive(payload.course_id, payload.lecture_id, identity.user_id);
        let record = self.attendance.mark_present(&token, Utc::now()).await?;

        info!(
            lecture_id = %record.lecture_id,
            student_id = %record.student_id,
            "student checked in"
        );
        Ok(record.status)
    }
}
