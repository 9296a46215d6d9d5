use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use campus_core::health::{healthz, readiness};
use campus_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    attendance::{get_course_attendance, get_lecture_attendance, scan, toggle_attendance},
    lecture::{create_course_lectures, create_lecture},
    session::{close_session, open_session},
};
use crate::state::AppState;

/// `GET /readyz`: ready once the database answers a ping.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Lectures
        .route("/lectures", post(create_lecture))
        .route("/courses/{id}/lectures", post(create_course_lectures))
        // Attendance sessions
        .route("/lectures/{id}/session/open", post(open_session))
        .route("/lectures/{id}/session/close", patch(close_session))
        // Check-in
        .route("/attendance/scan", post(scan))
        .route("/attendance/{record_id}/toggle", patch(toggle_attendance))
        // Views
        .route("/lectures/{id}/attendance", get(get_lecture_attendance))
        .route("/courses/{id}/attendance", get(get_course_attendance))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
