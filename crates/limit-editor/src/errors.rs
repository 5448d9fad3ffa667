use quota_shared::{id::UserId, uac::DailyLimit};

use crate::batch::FailedUpdate;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the limit editor is not open")]
    NotOpen,
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("user '{0}' is not editable in this session")]
    UnknownUser(UserId),
}

/// One or more updates in a batch were rejected
///
/// Updates are independent so the ones listed in `committed` were still
/// applied by the store.
#[derive(Debug, thiserror::Error)]
#[error("{} of {} limit updates failed", .failed.len(), .attempted)]
pub struct PersistenceFailure {
    pub attempted: usize,
    pub committed: Vec<(UserId, DailyLimit)>,
    pub failed: Vec<FailedUpdate>,
}
