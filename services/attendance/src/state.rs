use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use campus_auth_types::identity::AccessTokenSecret;

use crate::infra::codec::ChaChaPayloadCodec;
use crate::infra::db::{DbAttendanceRepository, DbCourseRepository, DbLectureRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub access_token_secret: AccessTokenSecret,
    pub codec: ChaChaPayloadCodec,
}

impl AppState {
    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn lecture_repo(&self) -> DbLectureRepository {
        DbLectureRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_repo(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }

    pub fn payload_codec(&self) -> ChaChaPayloadCodec {
        self.codec.clone()
    }
}

impl FromRef<AppState> for AccessTokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.access_token_secret.clone()
    }
}
