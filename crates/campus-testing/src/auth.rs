//! Mock auth helpers for integration tests.
//!
//! Services validate `Authorization: Bearer` access tokens themselves. In tests,
//! `MockAuth` mints a real token with the shared test secret so requests go
//! through the same extractor as production.

use std::time::{SystemTime, UNIX_EPOCH};

use campus_auth_types::token::issue_access_token;
use campus_domain::id::UserId;
use campus_domain::role::Role;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

/// Secret both the mock issuer and the service under test are configured with.
pub const TEST_ACCESS_TOKEN_SECRET: &str = "campus-test-access-token-secret";

const TOKEN_TTL_SECS: u64 = 3600;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub role: Role,
}

impl MockAuth {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn student(user_id: UserId) -> Self {
        Self::new(user_id, Role::Student)
    }

    pub fn doctor(user_id: UserId) -> Self {
        Self::new(user_id, Role::Doctor)
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Signed access token for this identity.
    pub fn token(&self) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + TOKEN_TTL_SECS;
        issue_access_token(self.user_id, self.role, exp, TEST_ACCESS_TOKEN_SECRET)
            .expect("failed to sign test access token")
    }

    /// `Authorization` header value carrying the bearer token.
    pub fn authorization(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }

    /// Headers as a client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.authorization());
        map
    }
}
