use futures::channel::oneshot;
use quota_shared::{id::UserId, uac::DailyLimit};

use crate::{Client, UiCallBack};

/// A backend that can persist a single user's daily limit
///
/// Each call is independent of any other. The result is delivered on the
/// returned receiver and `ui_notify` is called once it is available so that
/// a UI can wake up and poll.
pub trait LimitStore {
    fn update_daily_limit<F: UiCallBack>(
        &self,
        user_id: UserId,
        limit: DailyLimit,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>;
}

impl LimitStore for Client {
    fn update_daily_limit<F: UiCallBack>(
        &self,
        user_id: UserId,
        limit: DailyLimit,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.update_user_limit(user_id, limit, ui_notify)
    }
}
