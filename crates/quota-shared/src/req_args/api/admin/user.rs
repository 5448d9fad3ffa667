use crate::{id::UserId, uac::DailyLimit};

/// Kind of record targeted by a keyed update
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Users,
}

/// Column of a user record that clients are allowed to update
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    DailyLimit,
}

/// Keyed update of a single field on a single record
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateLimitReqArgs {
    pub entity: Entity,
    pub id: UserId,
    pub field: UserField,
    pub value: DailyLimit,
}

impl UpdateLimitReqArgs {
    pub fn new(id: UserId, value: DailyLimit) -> Self {
        Self {
            entity: Entity::Users,
            id,
            field: UserField::DailyLimit,
            value,
        }
    }
}
