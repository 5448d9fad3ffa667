use std::fmt::Display;

use egui::WidgetText;

use crate::id::UserId;

use super::{DailyLimit, Role};

/// Name shown to operators, taken as is from the store
#[derive(Default, Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct DisplayName(String);

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DisplayName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&DisplayName> for WidgetText {
    fn from(value: &DisplayName) -> Self {
        (&value.0).into()
    }
}

/// A user account as the data store reports it
///
/// Read only as far as the clients are concerned except for the daily limit
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: DisplayName,
    pub role: Role,
    pub daily_limit: DailyLimit,
    pub is_active: bool,
}

/// The users list along with the role of the account that requested it
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UsersOverview {
    pub caller_role: Role,
    pub users: Vec<UserRecord>,
}
