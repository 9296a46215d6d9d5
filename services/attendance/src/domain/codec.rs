//! QR payload port.
//!
//! The payload names a (course, lecture) pair and nothing else. Student
//! identity never travels in it.

use campus_domain::id::{CourseId, LectureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPayload {
    pub course_id: CourseId,
    pub lecture_id: LectureId,
}

/// Why a scanned payload was rejected. Never shown to the scanning client.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("request carries no payload string")]
    Missing,
    #[error("payload is not valid base64url")]
    Encoding,
    #[error("payload is shorter than a nonce and tag")]
    Truncated,
    #[error("payload failed authentication")]
    Authentication,
    #[error("payload plaintext is not utf-8")]
    Utf8,
    #[error("payload plaintext is not a course,lecture pair")]
    Shape,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to encrypt payload")]
pub struct EncodeError;

/// Symmetric encoder for the (course, lecture) pair rendered into the QR image.
pub trait PayloadCodec: Send + Sync {
    fn encode(&self, payload: &QrPayload) -> Result<String, EncodeError>;
    fn decode(&self, raw: &str) -> Result<QrPayload, DecodeError>;
}

impl QrPayload {
    /// `"{course_id},{lecture_id}"`.
    pub fn to_plaintext(&self) -> String {
        format!("{},{}", self.course_id, self.lecture_id)
    }

    pub fn from_plaintext(plaintext: &str) -> Result<Self, DecodeError> {
        let mut fields = plaintext.split(',');
        let (Some(course), Some(lecture), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(DecodeError::Shape);
        };
        Ok(Self {
            course_id: course.parse().map_err(|_| DecodeError::Shape)?,
            lecture_id: lecture.parse().map_err(|_| DecodeError::Shape)?,
        })
    }
}
