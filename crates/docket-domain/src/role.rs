//! Account role types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named account role.
///
/// The service only ever assigns [`Role::User`]; it is granted on an
/// account's first authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
}

impl Role {
    /// Role name as stored in the `roles` table.
    pub fn name(self) -> &'static str {
        match self {
            Self::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
