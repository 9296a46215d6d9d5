//! Domain types shared across all campus services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod attendance;
pub mod id;
pub mod role;
pub mod session;
