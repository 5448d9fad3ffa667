use egui::Button;
use limit_editor::{LimitEditor, Notification, Preset};
use quota_client_core::Client;
use quota_shared::{
    const_config::limits::STEP_DELTAS, internal_error, log_err_as_error, log_err_as_warn,
    uac::UserRecord,
};

use super::ui_active_status;
use crate::{app::wake_fn, ui_helpers::ui_escape_button};

/// Shows the entry button and, while a session is open, the editing window
///
/// Also collects the outcome of a save once it completes. `should_refresh` is
/// set only when every update succeeded.
pub fn ui_quick_limit_setter(
    ui: &mut egui::Ui,
    client: &Client,
    editor: &mut LimitEditor,
    should_refresh: &mut bool,
    notifications: &mut Vec<Notification>,
) {
    if let Some(notification) = editor.poll_save(|| *should_refresh = true) {
        notifications.push(notification);
    }

    if ui
        .add_enabled(!editor.is_open(), Button::new("Quick Limit Setter"))
        .clicked()
    {
        log_err_as_warn!(editor.open());
    }

    if !editor.is_open() {
        return;
    }

    let mut is_window_open = true;
    egui::Window::new("Quick Limit Setter")
        .open(&mut is_window_open)
        .collapsible(false)
        .resizable(true)
        .show(ui.ctx(), |ui| {
            ui.label("Set the daily limit of several users at once");
            ui.separator();
            egui::ScrollArea::vertical()
                .max_height(400.0)
                .show(ui, |ui| {
                    if editor.is_persisting() {
                        ui.disable();
                    }
                    // Cloned so the editor can be mutated while iterating
                    let users = editor.users().to_vec();
                    for user in users.iter() {
                        ui_limit_row(ui, editor, user);
                    }
                });
            ui.separator();
            if ui_footer(ui, client, editor) {
                log_err_as_warn!(editor.cancel());
            }
        });

    if !is_window_open {
        // Closing is ignored while saving, the window reappears next frame
        log_err_as_warn!(editor.cancel());
    }
}

fn ui_limit_row(ui: &mut egui::Ui, editor: &mut LimitEditor, user: &UserRecord) {
    let Some(draft) = editor.draft(&user.id) else {
        internal_error!(format!("no draft found for user {}", user.id));
        return;
    };
    let is_changed = editor.is_changed(&user.id);
    let is_failed = editor.failed_last_save().contains(&user.id);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(user.display_name.to_string());
                    ui_change_indicator(ui, is_changed);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("Current limit: {} |", user.daily_limit));
                    ui_active_status(ui, user.is_active);
                });
                if is_failed {
                    ui.colored_label(ui.visuals().error_fg_color, "Last save failed");
                }
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.vertical(|ui| {
                    ui.heading(draft.to_string());
                    ui.small("New limit");
                });
            });
        });

        ui.horizontal_wrapped(|ui| {
            for preset in Preset::all() {
                if ui
                    .selectable_label(draft == preset.limit(), preset.limit().to_string())
                    .clicked()
                {
                    log_err_as_error!(editor.apply_preset(&user.id, preset));
                }
            }
        });

        ui.horizontal(|ui| {
            for delta in STEP_DELTAS.iter().filter(|delta| delta.is_negative()) {
                ui_step_button(ui, editor, user, *delta);
            }
            let mut text = draft.to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut text).desired_width(60.0))
                .changed()
            {
                log_err_as_error!(editor.set_from_input(&user.id, &text));
            }
            for delta in STEP_DELTAS.iter().filter(|delta| delta.is_positive()) {
                ui_step_button(ui, editor, user, *delta);
            }
        });
    });
}

fn ui_step_button(ui: &mut egui::Ui, editor: &mut LimitEditor, user: &UserRecord, delta: i64) {
    if ui.button(format!("{delta:+}")).clicked() {
        log_err_as_error!(editor.apply_delta(&user.id, delta));
    }
}

/// Returns true if the operator asked to cancel
fn ui_footer(ui: &mut egui::Ui, client: &Client, editor: &mut LimitEditor) -> bool {
    ui.horizontal(|ui| {
        ui.label(format!(
            "{} of {} limits changed",
            editor.changed_count(),
            editor.users().len()
        ));
        let is_persisting = editor.is_persisting();
        let is_cancel_requested = ui
            .add_enabled_ui(!is_persisting, |ui| ui_escape_button(ui, "Cancel"))
            .inner;
        if ui
            .add_enabled(!is_persisting, Button::new("Save All Limits"))
            .clicked()
        {
            let ctx = ui.ctx().clone();
            log_err_as_warn!(editor.save(client, wake_fn(ctx)));
        }
        if is_persisting {
            ui.spinner();
            ui.label("Saving...");
        }
        is_cancel_requested
    })
    .inner
}

fn ui_change_indicator(ui: &mut egui::Ui, is_changed: bool) {
    if is_changed {
        ui.label("*");
    } else {
        // Add placeholder space for indicator to avoid resizing
        ui.label("  ");
    }
}
