//! Shared items related to user account control

mod limit;
mod role;
mod user;

pub use limit::DailyLimit;
pub use role::Role;
pub use user::{DisplayName, UserRecord, UsersOverview};
