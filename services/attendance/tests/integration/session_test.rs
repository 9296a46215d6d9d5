use campus_attendance::domain::codec::PayloadCodec;
use campus_attendance::error::AttendanceServiceError;
use campus_domain::attendance::AttendanceStatus;
use campus_domain::id::LectureId;
use campus_domain::session::SessionState;

use crate::helpers::{as_student, classroom, close_usecase, codec, doctor, open_usecase};

// ── OpenSessionUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_materialize_one_absent_record_per_enrolled_student() {
    let class = classroom(&["amira", "omar", "yusuf"]);

    let output = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    assert_eq!(output.records_created, 3);
    let records = class.store.records_for(class.lecture.id);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == AttendanceStatus::Absent));
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Open);
}

#[tokio::test]
async fn should_return_payload_naming_course_and_lecture() {
    let class = classroom(&["amira"]);

    let output = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    let payload = codec().decode(&output.payload).unwrap();
    assert_eq!(payload.course_id, class.course.id);
    assert_eq!(payload.lecture_id, class.lecture.id);
}

#[tokio::test]
async fn should_not_rematerialize_on_second_open() {
    let class = classroom(&["amira", "omar"]);
    let usecase = open_usecase(&class.store);

    usecase.execute(class.doctor, class.lecture.id).await.unwrap();
    let second = usecase.execute(class.doctor, class.lecture.id).await.unwrap();

    assert_eq!(second.records_created, 0);
    assert_eq!(class.store.records_for(class.lecture.id).len(), 2);
    assert_eq!(class.store.initializations(), 1);
}

#[tokio::test]
async fn should_reopen_closed_session_without_new_records() {
    let class = classroom(&["amira"]);
    open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();
    close_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Closed);

    let reopened = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    assert_eq!(reopened.records_created, 0);
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Open);
    assert_eq!(class.store.records_for(class.lecture.id).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_materialize_once_under_concurrent_opens() {
    let class = classroom(&["amira", "omar", "yusuf", "zeina"]);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = class.store.clone();
            let doctor = class.doctor;
            let lecture_id = class.lecture.id;
            tokio::spawn(async move { open_usecase(&store).execute(doctor, lecture_id).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        created += handle.await.unwrap().unwrap().records_created;
    }

    assert_eq!(created, 4);
    assert_eq!(class.store.initializations(), 1);
    assert_eq!(class.store.records_for(class.lecture.id).len(), 4);
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Open);
}

#[tokio::test]
async fn should_leave_lecture_uninitialized_when_insert_fails() {
    let class = classroom(&["amira", "omar"]);
    class.store.data.lock().unwrap().fail_next_insert = true;

    let err = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::Internal(_)));
    assert_eq!(
        class.store.session_state(class.lecture.id),
        SessionState::Uninitialized
    );
    assert!(class.store.records_for(class.lecture.id).is_empty());

    let retry = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();
    assert_eq!(retry.records_created, 2);
}

#[tokio::test]
async fn should_open_lecture_with_no_enrolled_students() {
    let class = classroom(&[]);

    let output = open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    assert_eq!(output.records_created, 0);
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Open);
}

#[tokio::test]
async fn should_reject_open_by_other_doctor() {
    let class = classroom(&["amira"]);

    let err = open_usecase(&class.store)
        .execute(doctor(), class.lecture.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::Forbidden));
    assert!(class.store.records_for(class.lecture.id).is_empty());
}

#[tokio::test]
async fn should_reject_open_by_student() {
    let class = classroom(&["amira"]);

    let err = open_usecase(&class.store)
        .execute(as_student(&class.students[0]), class.lecture.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::Forbidden));
}

#[tokio::test]
async fn should_return_lecture_not_found_for_unknown_lecture() {
    let class = classroom(&["amira"]);

    let err = open_usecase(&class.store)
        .execute(class.doctor, LectureId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::LectureNotFound));
}

// ── CloseSessionUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_acknowledge_close_of_uninitialized_lecture_without_change() {
    let class = classroom(&["amira"]);

    close_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    assert_eq!(
        class.store.session_state(class.lecture.id),
        SessionState::Uninitialized
    );
}

#[tokio::test]
async fn should_keep_closed_session_closed_when_closed_again() {
    let class = classroom(&["amira"]);
    open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();
    let usecase = close_usecase(&class.store);

    usecase.execute(class.doctor, class.lecture.id).await.unwrap();
    usecase.execute(class.doctor, class.lecture.id).await.unwrap();

    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Closed);
}

#[tokio::test]
async fn should_reject_close_by_other_doctor() {
    let class = classroom(&["amira"]);
    open_usecase(&class.store)
        .execute(class.doctor, class.lecture.id)
        .await
        .unwrap();

    let err = close_usecase(&class.store)
        .execute(doctor(), class.lecture.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceServiceError::Forbidden));
    assert_eq!(class.store.session_state(class.lecture.id), SessionState::Open);
}
