use quota_shared::uac::{Role, UserRecord};

/// Returns the users whose limits `caller_role` is allowed to change, in the
/// order they were given
pub fn editable_users(users: &[UserRecord], caller_role: Role) -> Vec<UserRecord> {
    users
        .iter()
        .filter(|user| caller_role.can_manage(user.role))
        .cloned()
        .collect()
}
