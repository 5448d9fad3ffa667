use serde::{Deserialize, Serialize};

/// The closed set of roles an account can hold
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    /// The base role, held by ordinary accounts
    User,
}

impl Role {
    /// Returns true if an account holding `self` may change the limits of an
    /// account holding `target`
    ///
    /// Admins manage everyone, managers only manage base users and base users
    /// manage nobody
    #[must_use]
    pub fn can_manage(self, target: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => target == Role::User,
            Role::User => false,
        }
    }
}
