use std::collections::BTreeSet;

use uuid::Uuid;

/// Authority granted to every registered user.
pub const ROLE_USER: &str = "ROLE_USER";

/// The authenticated identity attached to a request.
///
/// Rebuilt on every request from token claims plus a credential lookup;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub authorities: BTreeSet<String>,
}

impl Principal {
    /// Principal for a regular user.
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            authorities: BTreeSet::from([ROLE_USER.to_string()]),
        }
    }
}
