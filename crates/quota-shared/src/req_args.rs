//! This module stores the expected format of the arguments for the requests
//! The structure of the module is supposed to match the path of the endpoints.
//! For example `/api/admin/user/update` maps to
//! [`api::admin::user::UpdateLimitReqArgs`]

pub mod api {
    pub mod admin {
        pub mod user;
    }
}
