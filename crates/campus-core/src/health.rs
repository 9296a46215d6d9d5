use axum::http::StatusCode;

/// Handler for `GET /healthz`. Liveness only, never touches dependencies.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a readiness probe result to a status code.
///
/// Services call this from their own `/readyz` handler after pinging whatever
/// they depend on.
pub fn readiness<E: std::fmt::Display>(probe: Result<(), E>) -> StatusCode {
    match probe {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
