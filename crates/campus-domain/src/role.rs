//! Actor role domain types.

use serde::{Deserialize, Serialize};

/// Closed set of roles an authenticated actor can hold.
///
/// Wire format: `u8` (0 = Student, 1 = Doctor, 2 = Admin), carried in the `role`
/// claim of the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student = 0,
    Doctor = 1,
    Admin = 2,
}

impl Role {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Student),
            1 => Some(Self::Doctor),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Capability check: is this role one of `allowed`?
    pub fn is_one_of(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }
}
