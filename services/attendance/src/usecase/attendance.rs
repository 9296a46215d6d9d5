use chrono::Utc;
use tracing::info;

use campus_auth_types::identity::Identity;
use campus_domain::id::{AttendanceRecordId, CourseId, LectureId};
use campus_domain::role::Role;

use crate::domain::repository::{AttendanceRepository, CourseRepository, LectureRepository};
use crate::domain::types::{AttendanceRecord, StudentAttendance, group_by_student};
use crate::error::AttendanceServiceError;
use crate::usecase::{require_course_doctor, require_course_viewer, require_role};

// ── ToggleAttendance ─────────────────────────────────────────────────────────

pub struct ToggleAttendanceUseCase<C: CourseRepository, A: AttendanceRepository> {
    pub courses: C,
    pub attendance: A,
}

impl<C: CourseRepository, A: AttendanceRepository> ToggleAttendanceUseCase<C, A> {
    pub async fn execute(
        &self,
        identity: Identity,
        record_id: AttendanceRecordId,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        require_role(&identity, &[Role::Doctor])?;
        let record = self
            .attendance
            .find_by_id(record_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;
        let course = self
            .courses
            .find_by_id(record.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;
        require_course_doctor(&identity, &course)?;

        let updated = self.attendance.toggle_status(record_id, Utc::now()).await?;
        info!(
            record_id = %updated.id,
            status = %updated.status,
            doctor_id = %identity.user_id,
            "attendance overridden"
        );
        Ok(updated)
    }
}

// ── ViewLectureAttendance ────────────────────────────────────────────────────

pub struct ViewLectureAttendanceUseCase<
    C: CourseRepository,
    L: LectureRepository,
    A: AttendanceRepository,
> {
    pub courses: C,
    pub lectures: L,
    pub attendance: A,
}

impl<C: CourseRepository, L: LectureRepository, A: AttendanceRepository>
    ViewLectureAttendanceUseCase<C, L, A>
{
    pub async fn execute(
        &self,
        identity: Identity,
        lecture_id: LectureId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        require_role(&identity, &[Role::Doctor, Role::Admin])?;
        let lecture = self
            .lectures
            .find_by_id(lecture_id)
            .await?
            .ok_or(AttendanceServiceError::LectureNotFound)?;
        let course = self
            .courses
            .find_by_id(lecture.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;
        require_course_viewer(&identity, &course)?;
        self.attendance.list_by_lecture(lecture.id).await
    }
}

// ── ViewCourseAttendance ─────────────────────────────────────────────────────

pub struct ViewCourseAttendanceUseCase<C: CourseRepository, A: AttendanceRepository> {
    pub courses: C,
    pub attendance: A,
}

impl<C: CourseRepository, A: AttendanceRepository> ViewCourseAttendanceUseCase<C, A> {
    pub async fn execute(
        &self,
        identity: Identity,
        course_id: CourseId,
    ) -> Result<Vec<StudentAttendance>, AttendanceServiceError> {
        require_role(&identity, &[Role::Doctor, Role::Admin])?;
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;
        require_course_viewer(&identity, &course)?;
        let records = self.attendance.list_by_course(course.id).await?;
        Ok(group_by_student(records))
    }
}
