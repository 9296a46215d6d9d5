use campus_attendance::error::AttendanceServiceError;
use campus_attendance::usecase::lecture::{
    CreateCourseLecturesUseCase, CreateLectureInput, CreateLectureUseCase,
};
use campus_domain::attendance::unique_lecture_key;
use campus_domain::id::CourseId;
use campus_domain::session::SessionState;

use crate::helpers::{MockStore, admin, doctor};

fn create_lecture(store: &MockStore) -> CreateLectureUseCase<MockStore, MockStore> {
    CreateLectureUseCase {
        courses: store.clone(),
        lectures: store.clone(),
    }
}

fn create_course_lectures(store: &MockStore) -> CreateCourseLecturesUseCase<MockStore, MockStore> {
    CreateCourseLecturesUseCase {
        courses: store.clone(),
        lectures: store.clone(),
    }
}

fn input(course_id: CourseId, lecture_number: i64) -> CreateLectureInput {
    CreateLectureInput {
        course_id,
        lecture_number,
        title: None,
    }
}

// ── CreateLectureUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_uninitialized_lecture_with_default_title() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);

    let lecture = create_lecture(&store)
        .execute(admin(), input(course.id, 4))
        .await
        .unwrap();

    assert_eq!(lecture.lecture_number, 4);
    assert_eq!(lecture.title, "Lecture 4");
    assert_eq!(lecture.session_state, SessionState::Uninitialized);
    assert_eq!(lecture.unique_lecture, unique_lecture_key(course.id, 4));
    assert_eq!(store.lecture_count(course.id), 1);
}

#[tokio::test]
async fn should_keep_given_title() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);

    let lecture = create_lecture(&store)
        .execute(
            admin(),
            CreateLectureInput {
                course_id: course.id,
                lecture_number: 1,
                title: Some("  Scheduling  ".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(lecture.title, "Scheduling");
}

#[tokio::test]
async fn should_reject_duplicate_lecture_slot() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);
    let usecase = create_lecture(&store);
    usecase.execute(admin(), input(course.id, 2)).await.unwrap();

    let err = usecase
        .execute(admin(), input(course.id, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::LectureAlreadyExists));
    assert_eq!(store.lecture_count(course.id), 1);
}

#[tokio::test]
async fn should_allow_same_number_in_different_courses() {
    let store = MockStore::new();
    let first = store.add_course(doctor().user_id);
    let second = store.add_course(doctor().user_id);
    let usecase = create_lecture(&store);

    usecase.execute(admin(), input(first.id, 1)).await.unwrap();
    usecase.execute(admin(), input(second.id, 1)).await.unwrap();

    assert_eq!(store.lecture_count(first.id), 1);
    assert_eq!(store.lecture_count(second.id), 1);
}

#[tokio::test]
async fn should_reject_out_of_range_lecture_numbers() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);
    let usecase = create_lecture(&store);

    for number in [0, 13, -1, 256] {
        let err = usecase
            .execute(admin(), input(course.id, number))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AttendanceServiceError::InvalidLectureNumber),
            "expected InvalidLectureNumber for {number}, got {err:?}"
        );
    }
    assert_eq!(store.lecture_count(course.id), 0);
}

#[tokio::test]
async fn should_reject_lecture_creation_by_doctor() {
    let store = MockStore::new();
    let owner = doctor();
    let course = store.add_course(owner.user_id);

    let err = create_lecture(&store)
        .execute(owner, input(course.id, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::Forbidden));
}

#[tokio::test]
async fn should_return_course_not_found_when_creating_lecture() {
    let store = MockStore::new();

    let err = create_lecture(&store)
        .execute(admin(), input(CourseId::new(), 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::CourseNotFound));
}

// ── CreateCourseLecturesUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_create_twelve_numbered_lectures() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);

    let lectures = create_course_lectures(&store)
        .execute(admin(), course.id)
        .await
        .unwrap();

    let numbers: Vec<u8> = lectures.iter().map(|l| l.lecture_number).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
    assert_eq!(lectures[11].title, "Lecture 12");
    assert_eq!(store.lecture_count(course.id), 12);
}

#[tokio::test]
async fn should_create_nothing_when_any_slot_exists() {
    let store = MockStore::new();
    let course = store.add_course(doctor().user_id);
    create_lecture(&store)
        .execute(admin(), input(course.id, 7))
        .await
        .unwrap();

    let err = create_course_lectures(&store)
        .execute(admin(), course.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::LectureAlreadyExists));
    assert_eq!(store.lecture_count(course.id), 1);
}
