//! Auth types shared across campus services.
//!
//! Provides access-token validation and the `Identity` extractor that turns a
//! bearer token into an authenticated `(user id, role)` pair.

pub mod identity;
pub mod token;
