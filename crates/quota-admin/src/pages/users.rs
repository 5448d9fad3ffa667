use egui::Button;
use egui_extras::{Column, TableBuilder};
use limit_editor::{LimitEditor, Notification};
use quota_client_core::Client;
use quota_shared::uac::{DailyLimit, UserRecord, UsersOverview};

use super::data_state::{AwaitingType, DataState};
use crate::{app::wake_fn, ui_helpers::get_text_height};

mod quick_limits;

/// Lists the users and hosts the quick limit setter for the ones the caller
/// may manage
#[derive(Debug, Default)]
pub struct UiUsers {
    should_refresh: bool,
    data_state: DataState<UsersOverview>,
    /// `None` if there is no data yet or the caller cannot edit anyone
    limit_editor: Option<LimitEditor>,
    notifications: Vec<Notification>,
}

impl UiUsers {
    fn reset_to_default(&mut self) {
        self.should_refresh = Default::default();
        self.data_state = Default::default();
        self.limit_editor = Default::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, client: &Client) {
        if self.should_refresh {
            self.reset_to_default();
        }

        ui_notifications(ui, &mut self.notifications);

        if let DataState::Present(data) = &self.data_state {
            if self.limit_editor.is_none() {
                self.limit_editor = LimitEditor::new(&data.users, data.caller_role);
            }
            let is_editor_open = self
                .limit_editor
                .as_ref()
                .is_some_and(|editor| editor.is_open());
            ui.horizontal_wrapped(|ui| {
                if ui
                    .add_enabled(!is_editor_open, Button::new("Refresh Page"))
                    .clicked()
                {
                    self.should_refresh = true;
                }
                // Nothing is shown if the caller cannot edit anyone
                if let Some(editor) = self.limit_editor.as_mut() {
                    quick_limits::ui_quick_limit_setter(
                        ui,
                        client,
                        editor,
                        &mut self.should_refresh,
                        &mut self.notifications,
                    );
                }
            });
            ui.separator();
            let editor = self.limit_editor.as_ref();
            egui::ScrollArea::horizontal().show(ui, |ui| ui_show_user_list(ui, data, editor));
        } else {
            let ctx = ui.ctx().clone();
            self.data_state.get(Some(ui), None, || {
                AwaitingType(client.list_users(wake_fn(ctx)))
            });
        }
    }
}

fn ui_notifications(ui: &mut egui::Ui, notifications: &mut Vec<Notification>) {
    notifications.retain(|notification| {
        ui.horizontal(|ui| {
            let color = if notification.is_success() {
                egui::Color32::from_rgb(0, 160, 0)
            } else {
                ui.visuals().error_fg_color
            };
            ui.colored_label(color, notification.message());
            !ui.button("Dismiss").clicked()
        })
        .inner
    });
}

/// Limit to show in the users table
///
/// The editor knows about updates it has committed since the list was loaded
/// (a partially failed save does not trigger a refresh)
fn displayed_limit(user: &UserRecord, editor: Option<&LimitEditor>) -> DailyLimit {
    editor
        .and_then(|editor| editor.persisted_limit(&user.id))
        .unwrap_or(user.daily_limit)
}

fn ui_show_user_list(ui: &mut egui::Ui, data: &UsersOverview, editor: Option<&LimitEditor>) {
    let text_height = get_text_height(ui);
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0);

    let table = table.header(text_height, |mut header| {
        header.col(|ui| {
            ui.strong("Name");
        });
        header.col(|ui| {
            ui.strong("Role");
        });
        header.col(|ui| {
            ui.strong("Daily Limit");
        });
        header.col(|ui| {
            ui.strong("Status");
        });
    });

    table.body(|body| {
        body.rows(text_height, data.users.len(), |mut row| {
            let user: &UserRecord = &data.users[row.index()];
            row.col(|ui| {
                ui.label(&user.display_name);
            });
            row.col(|ui| {
                ui.label(user.role.to_string());
            });
            row.col(|ui| {
                ui.label(displayed_limit(user, editor).to_string());
            });
            row.col(|ui| {
                ui_active_status(ui, user.is_active);
            });
        });
    });
}

pub(crate) fn ui_active_status(ui: &mut egui::Ui, is_active: bool) {
    if is_active {
        ui.colored_label(egui::Color32::from_rgb(0, 160, 0), "Active");
    } else {
        ui.colored_label(ui.visuals().error_fg_color, "Inactive");
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use futures::channel::oneshot;
    use quota_client_core::{LimitStore, UiCallBack};
    use quota_shared::{id::UserId, uac::Role};

    use super::*;

    /// Answers immediately, rejecting the one configured user
    struct RejectingStore(UserId);

    impl LimitStore for RejectingStore {
        fn update_daily_limit<F: UiCallBack>(
            &self,
            user_id: UserId,
            _limit: DailyLimit,
            ui_notify: F,
        ) -> oneshot::Receiver<anyhow::Result<()>> {
            let (tx, rx) = oneshot::channel();
            let result = if user_id == self.0 {
                Err(anyhow!("rejected"))
            } else {
                Ok(())
            };
            tx.send(result).unwrap();
            ui_notify();
            rx
        }
    }

    fn user(id: &str, role: Role, limit: u32) -> UserRecord {
        UserRecord {
            id: id.try_into().unwrap(),
            display_name: id.into(),
            role,
            daily_limit: DailyLimit::new(limit),
            is_active: true,
        }
    }

    #[test]
    fn table_shows_limits_committed_by_a_partially_failed_save() {
        // Arrange
        let users = vec![
            user("u1", Role::User, 100),
            user("u2", Role::User, 200),
            user("m1", Role::Manager, 300),
        ];
        let mut editor = LimitEditor::new(&users, Role::Manager).unwrap();
        editor.open().unwrap();
        editor.apply_delta(&users[0].id, 50).unwrap();
        editor.apply_delta(&users[1].id, 50).unwrap();
        let store = RejectingStore(users[1].id.clone());

        // Act
        editor.save(&store, || {}).unwrap();
        let notification = editor.poll_save(|| {}).unwrap();
        let actual: Vec<u32> = users
            .iter()
            .map(|user| displayed_limit(user, Some(&editor)).get())
            .collect();

        // Assert
        assert!(!notification.is_success());
        assert_eq!(actual, [150, 200, 300]);
    }

    #[test]
    fn table_uses_loaded_limits_without_an_editor() {
        let user = user("u1", Role::User, 100);
        assert_eq!(displayed_limit(&user, None), DailyLimit::new(100));
    }
}
