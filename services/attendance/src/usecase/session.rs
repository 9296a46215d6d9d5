use chrono::Utc;
use tracing::{debug, info};

use campus_auth_types::identity::Identity;
use campus_domain::id::LectureId;
use campus_domain::role::Role;
use campus_domain::session::SessionState;

use crate::domain::codec::{PayloadCodec, QrPayload};
use crate::domain::repository::{CourseRepository, LectureRepository};
use crate::domain::types::{Course, Lecture, materialize};
use crate::error::AttendanceServiceError;
use crate::usecase::{require_course_doctor, require_role};

/// Resolve a lecture and its course, then check the actor owns the course.
async fn load_owned_lecture<C: CourseRepository, L: LectureRepository>(
    courses: &C,
    lectures: &L,
    identity: &Identity,
    lecture_id: LectureId,
) -> Result<(Lecture, Course), AttendanceServiceError> {
    require_role(identity, &[Role::Doctor])?;
    let lecture = lectures
        .find_by_id(lecture_id)
        .await?
        .ok_or(AttendanceServiceError::LectureNotFound)?;
    let course = courses
        .find_by_id(lecture.course_id)
        .await?
        .ok_or(AttendanceServiceError::CourseNotFound)?;
    require_course_doctor(identity, &course)?;
    Ok((lecture, course))
}

// ── OpenSession ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct OpenSessionOutput {
    /// Encrypted (course, lecture) pair to render as a QR code.
    pub payload: String,
    /// Ledger rows written by this call; zero unless it initialized the lecture.
    pub records_created: usize,
}

pub struct OpenSessionUseCase<C: CourseRepository, L: LectureRepository, P: PayloadCodec> {
    pub courses: C,
    pub lectures: L,
    pub codec: P,
}

impl<C: CourseRepository, L: LectureRepository, P: PayloadCodec> OpenSessionUseCase<C, L, P> {
    pub async fn execute(
        &self,
        identity: Identity,
        lecture_id: LectureId,
    ) -> Result<OpenSessionOutput, AttendanceServiceError> {
        let (lecture, course) =
            load_owned_lecture(&self.courses, &self.lectures, &identity, lecture_id).await?;

        let mut records_created = 0;
        if !lecture.session_state.is_initialized() {
            let students = self.courses.list_enrolled_students(course.id).await?;
            let records = materialize(&lecture, &students, Utc::now())?;
            let initialization = self.lectures.initialize(lecture.id, &records).await?;
            records_created = initialization.records_created();
            debug!(
                lecture_id = %lecture.id,
                ?initialization,
                "attendance initialization attempted"
            );
        }

        self.lectures
            .set_session_state(lecture.id, SessionState::Open)
            .await?;

        let payload = self
            .codec
            .encode(&QrPayload {
                course_id: course.id,
                lecture_id: lecture.id,
            })
            .map_err(anyhow::Error::new)?;

        info!(
            lecture_id = %lecture.id,
            course_id = %course.id,
            records_created,
            "attendance session opened"
        );
        Ok(OpenSessionOutput {
            payload,
            records_created,
        })
    }
}

// ── CloseSession ─────────────────────────────────────────────────────────────

pub struct CloseSessionUseCase<C: CourseRepository, L: LectureRepository> {
    pub courses: C,
    pub lectures: L,
}

impl<C: CourseRepository, L: LectureRepository> CloseSessionUseCase<C, L> {
    pub async fn execute(
        &self,
        identity: Identity,
        lecture_id: LectureId,
    ) -> Result<(), AttendanceServiceError> {
        let (lecture, _course) =
            load_owned_lecture(&self.courses, &self.lectures, &identity, lecture_id).await?;

        let applied = self
            .lectures
            .set_session_state(lecture.id, SessionState::Closed)
            .await?;
        if applied {
            info!(lecture_id = %lecture.id, "attendance session closed");
        } else {
            debug!(lecture_id = %lecture.id, "close ignored: attendance never taken");
        }
        Ok(())
    }
}
