//! Lecture attendance-session state machine.
//!
//! ```text
//! Uninitialized ──(first open, records materialized)──▶ Closed ⇄ Open
//! ```
//!
//! `Uninitialized` is never re-entered. "Open but not initialized" cannot be
//! represented.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No ledger rows exist for the lecture yet.
    Uninitialized,
    /// Ledger rows exist; scans are rejected.
    Closed,
    /// Ledger rows exist; scans are accepted.
    Open,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown session state: {0}")]
pub struct UnknownSessionState(pub String);

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }

    /// Ledger rows have been materialized for this lecture.
    pub fn is_initialized(self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Check-ins are currently accepted.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// States from which `open`/`close` may move the lecture.
    pub fn toggleable() -> [SessionState; 2] {
        [Self::Closed, Self::Open]
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionState {
    type Err = UnknownSessionState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uninitialized" => Ok(Self::Uninitialized),
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            other => Err(UnknownSessionState(other.to_owned())),
        }
    }
}
