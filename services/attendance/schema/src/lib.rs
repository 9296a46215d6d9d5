//! SeaORM entities for the attendance service.

pub mod attendance_records;
pub mod courses;
pub mod enrollments;
pub mod lectures;
pub mod users;
