mod data_state;
pub mod users;

pub use users::UiUsers;
