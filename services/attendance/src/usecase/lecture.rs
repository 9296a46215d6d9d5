use chrono::Utc;
use tracing::info;

use campus_auth_types::identity::Identity;
use campus_domain::attendance::{LECTURES_PER_COURSE, is_valid_lecture_number};
use campus_domain::id::CourseId;
use campus_domain::role::Role;

use crate::domain::repository::{CourseRepository, LectureRepository};
use crate::domain::types::Lecture;
use crate::error::AttendanceServiceError;
use crate::usecase::require_role;

fn default_title(lecture_number: u8) -> String {
    format!("Lecture {lecture_number}")
}

// ── CreateLecture ────────────────────────────────────────────────────────────

pub struct CreateLectureInput {
    pub course_id: CourseId,
    pub lecture_number: i64,
    pub title: Option<String>,
}

pub struct CreateLectureUseCase<C: CourseRepository, L: LectureRepository> {
    pub courses: C,
    pub lectures: L,
}

impl<C: CourseRepository, L: LectureRepository> CreateLectureUseCase<C, L> {
    pub async fn execute(
        &self,
        identity: Identity,
        input: CreateLectureInput,
    ) -> Result<Lecture, AttendanceServiceError> {
        require_role(&identity, &[Role::Admin])?;
        let lecture_number = u8::try_from(input.lecture_number)
            .ok()
            .filter(|n| is_valid_lecture_number(*n))
            .ok_or(AttendanceServiceError::InvalidLectureNumber)?;
        let course = self
            .courses
            .find_by_id(input.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;

        let title = input
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_title(lecture_number));
        let lecture = Lecture::new(course.id, lecture_number, title, Utc::now());
        self.lectures
            .create_many(std::slice::from_ref(&lecture))
            .await?;

        info!(
            lecture_id = %lecture.id,
            course_id = %course.id,
            lecture_number,
            "lecture created"
        );
        Ok(lecture)
    }
}

// ── CreateCourseLectures ─────────────────────────────────────────────────────

pub struct CreateCourseLecturesUseCase<C: CourseRepository, L: LectureRepository> {
    pub courses: C,
    pub lectures: L,
}

impl<C: CourseRepository, L: LectureRepository> CreateCourseLecturesUseCase<C, L> {
    /// Create every lecture slot of the course in one batch.
    pub async fn execute(
        &self,
        identity: Identity,
        course_id: CourseId,
    ) -> Result<Vec<Lecture>, AttendanceServiceError> {
        require_role(&identity, &[Role::Admin])?;
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;

        let now = Utc::now();
        let lectures: Vec<Lecture> = (1..=LECTURES_PER_COURSE)
            .map(|n| Lecture::new(course.id, n, default_title(n), now))
            .collect();
        self.lectures.create_many(&lectures).await?;

        info!(course_id = %course.id, count = lectures.len(), "course lectures created");
        Ok(lectures)
    }
}
