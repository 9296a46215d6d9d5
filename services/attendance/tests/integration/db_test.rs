//! Repository tests against a real Postgres.
//!
//! Ignored by default. Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test -p campus-attendance --test integration -- --ignored`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;

use campus_attendance::domain::repository::{
    AttendanceRepository, CourseRepository, LectureRepository,
};
use campus_attendance::domain::types::{Lecture, Student};
use campus_attendance::error::AttendanceServiceError;
use campus_attendance::infra::codec::ChaChaPayloadCodec;
use campus_attendance::infra::db::{
    DbAttendanceRepository, DbCourseRepository, DbLectureRepository,
};
use campus_attendance::usecase::check_in::CheckInUseCase;
use campus_attendance::usecase::session::OpenSessionUseCase;
use campus_attendance_migration::Migrator;
use campus_attendance_schema::{courses, enrollments, lectures, users};
use campus_auth_types::identity::Identity;
use campus_domain::attendance::{AttendanceStatus, CheckInToken};
use campus_domain::id::{CourseId, LectureId, UserId};
use campus_domain::role::Role;
use campus_domain::session::SessionState;

use crate::helpers::{as_student, codec};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn connect() -> DatabaseConnection {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    MIGRATED
        .get_or_init(|| async {
            let db = Database::connect(&url).await.unwrap();
            Migrator::up(&db, None).await.unwrap();
        })
        .await;
    Database::connect(&url).await.unwrap()
}

async fn insert_user(db: &DatabaseConnection, name: &str, role: Role) -> UserId {
    let id = UserId::new();
    users::ActiveModel {
        id: Set(id.0),
        name: Set(name.to_owned()),
        email: Set(format!("{}@campus.test", id.0.simple())),
        role: Set(i16::from(role.as_u8())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn enroll(db: &DatabaseConnection, course_id: CourseId, user_id: UserId) {
    enrollments::ActiveModel {
        course_id: Set(course_id.0),
        student_id: Set(user_id.0),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
}

/// A course with one lecture and the given students, all persisted.
struct PgClassroom {
    db: DatabaseConnection,
    doctor: Identity,
    course_id: CourseId,
    lecture_id: LectureId,
    students: Vec<Student>,
}

impl PgClassroom {
    async fn seed(student_names: &[&str]) -> Self {
        let db = connect().await;
        let doctor_id = insert_user(&db, "dr. hana", Role::Doctor).await;
        let course_id = CourseId::new();
        courses::ActiveModel {
            id: Set(course_id.0),
            name: Set("Distributed Systems".into()),
            code: Set(format!("DS-{}", course_id.0.simple())),
            doctor_id: Set(doctor_id.0),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        let lecture = Lecture::new(course_id, 1, "Lecture 1".into(), Utc::now());
        DbLectureRepository { db: db.clone() }
            .create_many(std::slice::from_ref(&lecture))
            .await
            .unwrap();

        let mut students = Vec::new();
        for name in student_names {
            let id = insert_user(&db, name, Role::Student).await;
            enroll(&db, course_id, id).await;
            students.push(Student {
                id,
                name: (*name).to_owned(),
            });
        }

        Self {
            db,
            doctor: Identity {
                user_id: doctor_id,
                role: Role::Doctor,
            },
            course_id,
            lecture_id: lecture.id,
            students,
        }
    }

    fn open_usecase(
        &self,
    ) -> OpenSessionUseCase<DbCourseRepository, DbLectureRepository, ChaChaPayloadCodec> {
        OpenSessionUseCase {
            courses: self.courses(),
            lectures: self.lectures(),
            codec: codec(),
        }
    }

    fn check_in_usecase(
        &self,
    ) -> CheckInUseCase<DbLectureRepository, DbAttendanceRepository, ChaChaPayloadCodec> {
        CheckInUseCase {
            lectures: self.lectures(),
            attendance: self.attendance(),
            codec: codec(),
        }
    }

    fn courses(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    fn lectures(&self) -> DbLectureRepository {
        DbLectureRepository {
            db: self.db.clone(),
        }
    }

    fn attendance(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn should_materialize_once_under_concurrent_opens() {
    let class = PgClassroom::seed(&["amira", "omar", "zeina"]).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let usecase = class.open_usecase();
            let doctor = class.doctor;
            let lecture_id = class.lecture_id;
            tokio::spawn(async move { usecase.execute(doctor, lecture_id).await })
        })
        .collect();
    let mut created = 0;
    for handle in handles {
        created += handle.await.unwrap().unwrap().records_created;
    }

    assert_eq!(created, 3);
    let records = class.attendance().list_by_lecture(class.lecture_id).await.unwrap();
    assert_eq!(records.len(), 3);
    let lecture = class
        .lectures()
        .find_by_id(class.lecture_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lecture.session_state, SessionState::Open);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn should_accept_exactly_one_of_concurrent_scans() {
    let class = PgClassroom::seed(&["amira"]).await;
    let payload = class
        .open_usecase()
        .execute(class.doctor, class.lecture_id)
        .await
        .unwrap()
        .payload;
    let student = as_student(&class.students[0]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let usecase = class.check_in_usecase();
            let payload = payload.clone();
            tokio::spawn(async move { usecase.execute(student, &payload).await })
        })
        .collect();
    let mut present = 0;
    let mut already = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(AttendanceStatus::Present) => present += 1,
            Err(AttendanceServiceError::AlreadyPresent) => already += 1,
            other => panic!("unexpected scan outcome: {other:?}"),
        }
    }

    assert_eq!(present, 1);
    assert_eq!(already, 7);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn should_report_unknown_token_as_record_not_found() {
    let class = PgClassroom::seed(&["amira"]).await;
    class
        .open_usecase()
        .execute(class.doctor, class.lecture_id)
        .await
        .unwrap();
    let outsider = CheckInToken::derive(class.course_id, class.lecture_id, UserId::new());

    let err = class
        .attendance()
        .mark_present(&outsider, Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::RecordNotFound));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn should_toggle_status_and_check_in_time() {
    let class = PgClassroom::seed(&["amira"]).await;
    class
        .open_usecase()
        .execute(class.doctor, class.lecture_id)
        .await
        .unwrap();
    let record_id = class
        .attendance()
        .list_by_lecture(class.lecture_id)
        .await
        .unwrap()[0]
        .id;

    let present = class
        .attendance()
        .toggle_status(record_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(present.status, AttendanceStatus::Present);
    assert!(present.checked_in_at.is_some());

    let absent = class
        .attendance()
        .toggle_status(record_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(absent.status, AttendanceStatus::Absent);
    assert!(absent.checked_in_at.is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn should_map_taken_lecture_slot_and_insert_nothing() {
    let class = PgClassroom::seed(&[]).await;
    let now = Utc::now();
    let batch: Vec<Lecture> = (1..=12)
        .map(|n| Lecture::new(class.course_id, n, format!("Lecture {n}"), now))
        .collect();

    let err = class.lectures().create_many(&batch).await.unwrap_err();

    assert!(matches!(err, AttendanceServiceError::LectureAlreadyExists));
    let count = lectures::Entity::find()
        .filter(lectures::Column::CourseId.eq(class.course_id.0))
        .count(&class.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn should_skip_non_student_enrollments() {
    let class = PgClassroom::seed(&["amira"]).await;
    let teaching_assistant = insert_user(&class.db, "ta yusuf", Role::Doctor).await;
    enroll(&class.db, class.course_id, teaching_assistant).await;

    let students = class
        .courses()
        .list_enrolled_students(class.course_id)
        .await
        .unwrap();
    let opened = class
        .open_usecase()
        .execute(class.doctor, class.lecture_id)
        .await
        .unwrap();

    assert_eq!(students, class.students);
    assert_eq!(opened.records_created, 1);
}
