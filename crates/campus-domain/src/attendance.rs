//! Attendance ledger domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{CourseId, LectureId, UserId};

/// Number of lecture slots every course has.
pub const LECTURES_PER_COURSE: u8 = 12;

/// Whether `n` is a valid course-scoped lecture number (1..=12).
pub fn is_valid_lecture_number(n: u8) -> bool {
    (1..=LECTURES_PER_COURSE).contains(&n)
}

/// Key that makes a (course, lecture number) slot unique.
pub fn unique_lecture_key(course_id: CourseId, lecture_number: u8) -> String {
    format!("{course_id}:{lecture_number}")
}

/// Attendance status of one student for one lecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Absent,
    Present,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown attendance status: {0}")]
pub struct UnknownAttendanceStatus(pub String);

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
        }
    }

    /// The status an administrative override flips to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Absent => Self::Present,
            Self::Present => Self::Absent,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownAttendanceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absent" => Ok(Self::Absent),
            "present" => Ok(Self::Present),
            other => Err(UnknownAttendanceStatus(other.to_owned())),
        }
    }
}

/// Join key linking a scan to its attendance record.
///
/// Not secret and not the QR payload: both materialization and check-in derive it
/// from the same (course, lecture, student) triple, so a scan can only ever reach
/// a row created for that student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInToken(String);

impl CheckInToken {
    /// Concatenation of the three ids in simple (unhyphenated) form, in the order
    /// course, lecture, student. Fixed width: 96 hex characters.
    pub fn derive(course_id: CourseId, lecture_id: LectureId, student_id: UserId) -> Self {
        Self(format!(
            "{}{}{}",
            course_id.0.simple(),
            lecture_id.0.simple(),
            student_id.0.simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CheckInToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CheckInToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
