//! Bearer-token identity extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::StatusCode;
use http::request::Parts;

use campus_domain::id::UserId;
use campus_domain::role::Role;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to validate access tokens. Provide it from the router state
/// via `FromRef`.
#[derive(Clone)]
pub struct AccessTokenSecret(pub Arc<str>);

impl AccessTokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated actor, taken from the `Authorization: Bearer` header.
///
/// Returns 401 if the header is absent or the token does not validate.
/// Role enforcement (403) is done by use cases after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn authorize(&self, allowed: &[Role]) -> bool {
        self.role.is_one_of(allowed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityRejection {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] AuthError),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHENTICATED",
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    AccessTokenSecret: FromRef<S>,
{
    type Rejection = IdentityRejection;

    // Header and secret are read synchronously so the returned future borrows nothing.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AccessTokenSecret::from_ref(state);
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|Authorization(bearer)| bearer.token().to_owned());

        async move {
            let token = bearer.ok_or(IdentityRejection::MissingToken)?;
            let info = validate_access_token(&token, &secret.0).inspect_err(|e| {
                tracing::debug!(error = %e, "rejected access token");
            })?;
            Ok(Self {
                user_id: info.user_id,
                role: info.role,
            })
        }
    }
}
