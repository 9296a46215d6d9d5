use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use campus_domain::attendance::{AttendanceStatus, CheckInToken, unique_lecture_key};
use campus_domain::id::{AttendanceRecordId, CourseId, LectureId, UserId};
use campus_domain::session::SessionState;

use crate::error::AttendanceServiceError;

/// Course owned by a single doctor.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub doctor_id: UserId,
}

/// Student enrolled in a course at the time of lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Lecture {
    pub id: LectureId,
    pub course_id: CourseId,
    pub lecture_number: u8,
    pub unique_lecture: String,
    pub title: String,
    pub session_state: SessionState,
    pub created_at: DateTime<Utc>,
}

impl Lecture {
    /// New lecture slot; attendance has never been taken for it.
    pub fn new(course_id: CourseId, lecture_number: u8, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: LectureId::new(),
            course_id,
            lecture_number,
            unique_lecture: unique_lecture_key(course_id, lecture_number),
            title,
            session_state: SessionState::Uninitialized,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: AttendanceRecordId,
    pub lecture_id: LectureId,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub student_name: String,
    pub lecture_number: u8,
    pub status: AttendanceStatus,
    pub check_in_token: CheckInToken,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn absent(lecture: &Lecture, student: &Student, now: DateTime<Utc>) -> Self {
        Self {
            id: AttendanceRecordId::new(),
            lecture_id: lecture.id,
            course_id: lecture.course_id,
            student_id: student.id,
            student_name: student.name.clone(),
            lecture_number: lecture.lecture_number,
            status: AttendanceStatus::Absent,
            check_in_token: CheckInToken::derive(lecture.course_id, lecture.id, student.id),
            checked_in_at: None,
            created_at: now,
        }
    }
}

/// Build one absent record per enrolled student.
///
/// Fails with `DuplicateToken` when two students derive the same token, which
/// only happens if the enrollment list repeats a student.
pub fn materialize(
    lecture: &Lecture,
    students: &[Student],
    now: DateTime<Utc>,
) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
    let mut seen = HashSet::with_capacity(students.len());
    let mut records = Vec::with_capacity(students.len());
    for student in students {
        let record = AttendanceRecord::absent(lecture, student, now);
        if !seen.insert(record.check_in_token.clone()) {
            return Err(AttendanceServiceError::DuplicateToken);
        }
        records.push(record);
    }
    Ok(records)
}

/// Result of the one-time ledger initialization of a lecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// This call flipped the lecture out of `uninitialized` and wrote the rows.
    Initialized { records_created: usize },
    /// Another call got there first; nothing was written.
    AlreadyInitialized,
}

impl Initialization {
    pub fn records_created(self) -> usize {
        match self {
            Self::Initialized { records_created } => records_created,
            Self::AlreadyInitialized => 0,
        }
    }
}

/// One cell of the course attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureAttendance {
    pub record_id: AttendanceRecordId,
    pub lecture_id: LectureId,
    pub lecture_number: u8,
    pub status: AttendanceStatus,
}

/// One row of the course attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAttendance {
    pub student_id: UserId,
    pub student_name: String,
    pub attendances: Vec<LectureAttendance>,
}

/// Group ledger rows by student, keeping the order in which each student first
/// appears.
pub fn group_by_student(records: Vec<AttendanceRecord>) -> Vec<StudentAttendance> {
    let mut index: HashMap<UserId, usize> = HashMap::new();
    let mut grouped: Vec<StudentAttendance> = Vec::new();
    for record in records {
        let slot = *index.entry(record.student_id).or_insert_with(|| {
            grouped.push(StudentAttendance {
                student_id: record.student_id,
                student_name: record.student_name.clone(),
                attendances: Vec::new(),
            });
            grouped.len() - 1
        });
        grouped[slot].attendances.push(LectureAttendance {
            record_id: record.id,
            lecture_id: record.lecture_id,
            lecture_number: record.lecture_number,
            status: record.status,
        });
    }
    grouped
}
