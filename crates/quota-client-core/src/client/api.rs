use futures::channel::oneshot;
use quota_shared::{
    const_config::path::{PATH_API_ADMIN_USERS_LIST, PATH_API_ADMIN_USER_UPDATE},
    id::UserId,
    req_args::api::admin::user::UpdateLimitReqArgs,
    uac::{DailyLimit, UsersOverview},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    /// Fetches every user visible to the caller along with the caller's role
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_users<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<UsersOverview>> {
        self.send_request_expect_json(PATH_API_ADMIN_USERS_LIST, &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_user_limit<F: UiCallBack>(
        &self,
        user_id: UserId,
        limit: DailyLimit,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        let args = UpdateLimitReqArgs::new(user_id, limit);
        self.send_request_expect_empty(PATH_API_ADMIN_USER_UPDATE, &args, ui_notify)
    }
}
