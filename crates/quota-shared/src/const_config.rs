//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = true;

pub mod limits {
    use crate::uac::DailyLimit;

    /// Values offered as one click presets, in display order
    pub const PRESET_LIMITS: [DailyLimit; 5] = [
        DailyLimit::new(100),
        DailyLimit::new(200),
        DailyLimit::new(300),
        DailyLimit::new(500),
        DailyLimit::new(1000),
    ];

    /// Relative adjustments offered as step buttons, in display order
    pub const STEP_DELTAS: [i64; 4] = [-50, -10, 10, 50];

    #[cfg(test)]
    mod tests {
        use super::*;

        const fn is_strictly_ascending(values: &[DailyLimit]) -> bool {
            let mut i = 1;
            while i < values.len() {
                if values[i - 1].get() >= values[i].get() {
                    return false;
                }
                i += 1;
            }
            true
        }

        static_assertions::const_assert!(is_strictly_ascending(&PRESET_LIMITS));
        static_assertions::const_assert!(STEP_DELTAS[0] < 0 && STEP_DELTAS[3] > 0);
    }
}

pub mod client {
    pub const DEFAULT_SERVER_ADDRESS: &str = "http://localhost:8789";
    /// Name of the header that carries the store API key
    pub const API_KEY_HEADER: &str = "apikey";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_API_ADMIN_USERS_LIST: PathSpec = PathSpec::get("/api/admin/users/list");
    pub const PATH_API_ADMIN_USER_UPDATE: PathSpec = PathSpec::post("/api/admin/user/update");
}
