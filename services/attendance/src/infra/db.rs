use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, SimpleExpr},
};

use campus_attendance_schema::{attendance_records, courses, enrollments, lectures, users};
use campus_domain::attendance::{AttendanceStatus, CheckInToken};
use campus_domain::id::{AttendanceRecordId, CourseId, LectureId, UserId};
use campus_domain::role::Role;
use campus_domain::session::SessionState;

use crate::domain::repository::{AttendanceRepository, CourseRepository, LectureRepository};
use crate::domain::types::{AttendanceRecord, Course, Initialization, Lecture, Student};
use crate::error::AttendanceServiceError;

/// Rows per INSERT statement; keeps bind parameters well under the Postgres limit.
const INSERT_CHUNK: usize = 1000;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, AttendanceServiceError> {
        let model = courses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn list_enrolled_students(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Student>, AttendanceServiceError> {
        let models = users::Entity::find()
            .join(JoinType::InnerJoin, users::Relation::Enrollments.def())
            .filter(enrollments::Column::CourseId.eq(course_id.0))
            .filter(users::Column::Role.eq(i16::from(Role::Student.as_u8())))
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list enrolled students")?;
        Ok(models
            .into_iter()
            .map(|model| Student {
                id: UserId(model.id),
                name: model.name,
            })
            .collect())
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: CourseId(model.id),
        name: model.name,
        code: model.code,
        doctor_id: UserId(model.doctor_id),
    }
}

// ── Lecture repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLectureRepository {
    pub db: DatabaseConnection,
}

impl LectureRepository for DbLectureRepository {
    async fn find_by_id(&self, id: LectureId) -> Result<Option<Lecture>, AttendanceServiceError> {
        let model = lectures::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find lecture by id")?;
        model.map(lecture_from_model).transpose()
    }

    async fn create_many(&self, new_lectures: &[Lecture]) -> Result<(), AttendanceServiceError> {
        if new_lectures.is_empty() {
            return Ok(());
        }
        let models: Vec<lectures::ActiveModel> =
            new_lectures.iter().map(lecture_to_active_model).collect();
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    lectures::Entity::insert_many(models).exec(txn).await?;
                    Ok(())
                })
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(err)) if is_unique_violation(&err) => {
                Err(AttendanceServiceError::LectureAlreadyExists)
            }
            Err(err) => Err(anyhow::Error::new(err).context("create lectures").into()),
        }
    }

    async fn initialize(
        &self,
        lecture_id: LectureId,
        records: &[AttendanceRecord],
    ) -> Result<Initialization, AttendanceServiceError> {
        let models: Vec<attendance_records::ActiveModel> =
            records.iter().map(record_to_active_model).collect();
        let result = self
            .db
            .transaction::<_, Initialization, DbErr>(|txn| {
                Box::pin(async move {
                    // The row lock taken here serializes concurrent openers.
                    let flipped = lectures::Entity::update_many()
                        .col_expr(
                            lectures::Column::SessionState,
                            Expr::value(SessionState::Closed.as_str()),
                        )
                        .filter(lectures::Column::Id.eq(lecture_id.0))
                        .filter(
                            lectures::Column::SessionState
                                .eq(SessionState::Uninitialized.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    if flipped.rows_affected == 0 {
                        return Ok(Initialization::AlreadyInitialized);
                    }

                    let records_created = models.len();
                    let mut models = models.into_iter().peekable();
                    while models.peek().is_some() {
                        let chunk: Vec<_> = models.by_ref().take(INSERT_CHUNK).collect();
                        attendance_records::Entity::insert_many(chunk)
                            .exec(txn)
                            .await?;
                    }
                    Ok(Initialization::Initialized { records_created })
                })
            })
            .await;
        match result {
            Ok(initialization) => Ok(initialization),
            Err(TransactionError::Transaction(err)) if is_unique_violation(&err) => {
                Err(AttendanceServiceError::DuplicateToken)
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context("initialize lecture attendance")
                .into()),
        }
    }

    async fn set_session_state(
        &self,
        lecture_id: LectureId,
        state: SessionState,
    ) -> Result<bool, AttendanceServiceError> {
        let result = lectures::Entity::update_many()
            .col_expr(lectures::Column::SessionState, Expr::value(state.as_str()))
            .filter(lectures::Column::Id.eq(lecture_id.0))
            .filter(
                lectures::Column::SessionState
                    .is_in(SessionState::toggleable().map(SessionState::as_str)),
            )
            .exec(&self.db)
            .await
            .context("set lecture session state")?;
        Ok(result.rows_affected > 0)
    }
}

fn lecture_from_model(model: lectures::Model) -> Result<Lecture, AttendanceServiceError> {
    let session_state = model
        .session_state
        .parse::<SessionState>()
        .context("parse lecture session state")?;
    let lecture_number =
        u8::try_from(model.lecture_number).context("lecture number out of range")?;
    Ok(Lecture {
        id: LectureId(model.id),
        course_id: CourseId(model.course_id),
        lecture_number,
        unique_lecture: model.unique_lecture,
        title: model.title,
        session_state,
        created_at: model.created_at,
    })
}

fn lecture_to_active_model(lecture: &Lecture) -> lectures::ActiveModel {
    use sea_orm::ActiveValue::Set;
    lectures::ActiveModel {
        id: Set(lecture.id.0),
        course_id: Set(lecture.course_id.0),
        lecture_number: Set(i16::from(lecture.lecture_number)),
        unique_lecture: Set(lecture.unique_lecture.clone()),
        title: Set(lecture.title.clone()),
        session_state: Set(lecture.session_state.as_str().to_owned()),
        created_at: Set(lecture.created_at),
    }
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find_by_id(
        &self,
        id: AttendanceRecordId,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let model = attendance_records::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find attendance record by id")?;
        model.map(record_from_model).transpose()
    }

    async fn mark_present(
        &self,
        token: &CheckInToken,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let updated = attendance_records::Entity::update_many()
            .col_expr(
                attendance_records::Column::Status,
                Expr::value(AttendanceStatus::Present.as_str()),
            )
            .col_expr(attendance_records::Column::CheckedInAt, Expr::value(Some(at)))
            .filter(attendance_records::Column::CheckInToken.eq(token.as_str()))
            .filter(attendance_records::Column::Status.eq(AttendanceStatus::Absent.as_str()))
            .exec_with_returning(&self.db)
            .await
            .context("mark attendance present")?;
        if let Some(model) = updated.into_iter().next() {
            return record_from_model(model);
        }

        let exists = attendance_records::Entity::find()
            .filter(attendance_records::Column::CheckInToken.eq(token.as_str()))
            .one(&self.db)
            .await
            .context("find attendance record by token")?;
        match exists {
            Some(_) => Err(AttendanceServiceError::AlreadyPresent),
            None => Err(AttendanceServiceError::RecordNotFound),
        }
    }

    async fn toggle_status(
        &self,
        id: AttendanceRecordId,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let was_absent =
            || Expr::col(attendance_records::Column::Status).eq(AttendanceStatus::Absent.as_str());
        let next_status: SimpleExpr = Expr::case(was_absent(), AttendanceStatus::Present.as_str())
            .finally(AttendanceStatus::Absent.as_str())
            .into();
        let next_checked_in_at: SimpleExpr = Expr::case(was_absent(), Expr::value(Some(at)))
            .finally(Expr::value(Option::<DateTime<Utc>>::None))
            .into();

        let updated = attendance_records::Entity::update_many()
            .col_expr(attendance_records::Column::Status, next_status)
            .col_expr(attendance_records::Column::CheckedInAt, next_checked_in_at)
            .filter(attendance_records::Column::Id.eq(id.0))
            .exec_with_returning(&self.db)
            .await
            .context("toggle attendance status")?;
        match updated.into_iter().next() {
            Some(model) => record_from_model(model),
            None => Err(AttendanceServiceError::RecordNotFound),
        }
    }

    async fn list_by_lecture(
        &self,
        lecture_id: LectureId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = attendance_records::Entity::find()
            .filter(attendance_records::Column::LectureId.eq(lecture_id.0))
            .order_by_asc(attendance_records::Column::StudentName)
            .order_by_asc(attendance_records::Column::StudentId)
            .all(&self.db)
            .await
            .context("list attendance by lecture")?;
        models.into_iter().map(record_from_model).collect()
    }

    async fn list_by_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = attendance_records::Entity::find()
            .filter(attendance_records::Column::CourseId.eq(course_id.0))
            .order_by_asc(attendance_records::Column::StudentName)
            .order_by_asc(attendance_records::Column::StudentId)
            .order_by_asc(attendance_records::Column::LectureNumber)
            .all(&self.db)
            .await
            .context("list attendance by course")?;
        models.into_iter().map(record_from_model).collect()
    }
}

fn record_from_model(
    model: attendance_records::Model,
) -> Result<AttendanceRecord, AttendanceServiceError> {
    let status = model
        .status
        .parse::<AttendanceStatus>()
        .context("parse attendance status")?;
    let lecture_number =
        u8::try_from(model.lecture_number).context("lecture number out of range")?;
    Ok(AttendanceRecord {
        id: AttendanceRecordId(model.id),
        lecture_id: LectureId(model.lecture_id),
        course_id: CourseId(model.course_id),
        student_id: UserId(model.student_id),
        student_name: model.student_name,
        lecture_number,
        status,
        check_in_token: CheckInToken::from(model.check_in_token),
        checked_in_at: model.checked_in_at,
        created_at: model.created_at,
    })
}

fn record_to_active_model(record: &AttendanceRecord) -> attendance_records::ActiveModel {
    use sea_orm::ActiveValue::Set;
    attendance_records::ActiveModel {
        id: Set(record.id.0),
        lecture_id: Set(record.lecture_id.0),
        course_id: Set(record.course_id.0),
        student_id: Set(record.student_id.0),
        student_name: Set(record.student_name.clone()),
        lecture_number: Set(i16::from(record.lecture_number)),
        status: Set(record.status.as_str().to_owned()),
        check_in_token: Set(record.check_in_token.as_str().to_owned()),
        checked_in_at: Set(record.checked_in_at),
        created_at: Set(record.created_at),
    }
}
