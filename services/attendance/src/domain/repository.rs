#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use campus_domain::attendance::CheckInToken;
use campus_domain::id::{AttendanceRecordId, CourseId, LectureId};
use campus_domain::session::SessionState;

use crate::domain::types::{AttendanceRecord, Course, Initialization, Lecture, Student};
use crate::error::AttendanceServiceError;

/// Read access to courses and their enrollment.
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, AttendanceServiceError>;

    /// Student accounts currently enrolled in the course, ordered by name.
    /// Enrollment rows pointing at other roles are skipped.
    async fn list_enrolled_students(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Student>, AttendanceServiceError>;
}

/// Lecture slots and their attendance-session state.
pub trait LectureRepository: Send + Sync {
    async fn find_by_id(&self, id: LectureId) -> Result<Option<Lecture>, AttendanceServiceError>;

    /// Insert all lectures or none. `LectureAlreadyExists` if any slot is taken.
    async fn create_many(&self, lectures: &[Lecture]) -> Result<(), AttendanceServiceError>;

    /// Move the lecture from `uninitialized` to `closed` and insert `records`,
    /// as one atomic step.
    ///
    /// Exactly one concurrent caller observes `Initialized`; the rest observe
    /// `AlreadyInitialized` and write nothing. A failed insert leaves the lecture
    /// uninitialized. A token collision with an existing row is `DuplicateToken`.
    async fn initialize(
        &self,
        lecture_id: LectureId,
        records: &[AttendanceRecord],
    ) -> Result<Initialization, AttendanceServiceError>;

    /// Set the session state of an initialized lecture.
    ///
    /// Returns `false` and writes nothing when the lecture is still
    /// uninitialized.
    async fn set_session_state(
        &self,
        lecture_id: LectureId,
        state: SessionState,
    ) -> Result<bool, AttendanceServiceError>;
}

/// The attendance ledger.
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: AttendanceRecordId,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;

    /// Flip the record holding `token` from absent to present in one
    /// conditional write.
    ///
    /// `RecordNotFound` if no record has the token, `AlreadyPresent` if it is not
    /// absent.
    async fn mark_present(
        &self,
        token: &CheckInToken,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceServiceError>;

    /// Flip present and absent in one conditional write. `RecordNotFound` if
    /// the id does not resolve.
    async fn toggle_status(
        &self,
        id: AttendanceRecordId,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceServiceError>;

    /// Records of one lecture, ordered by student name.
    async fn list_by_lecture(
        &self,
        lecture_id: LectureId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;

    /// Records of every lecture of a course, ordered by student name then
    /// lecture number.
    async fn list_by_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;
}
